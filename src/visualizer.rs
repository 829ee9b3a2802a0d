//! Frame tick tying the mesh pipeline, render mode and wave motion together.

use glam::Vec3;

use crate::audio::SpectrumSource;
use crate::error::ConfigError;
use crate::input::InputEvent;
use crate::mesh::SpectrumMesh;
use crate::params::{MeshParams, WaveIncrements, WaveParams};
use crate::rendering::{RenderBinding, RenderModeController};
use crate::wave::{WaveController, WaveMotion};

/// Result of one tick, ready to hand to the render backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Whether the mesh vertices were rewritten this frame
    pub mesh_updated: bool,
    pub binding: RenderBinding,
    pub marker_position: Vec3,
    pub elapsed_s: f32,
}

/// All per-frame simulation state, independent of window and GPU
pub struct Visualizer<S> {
    pub mesh: SpectrumMesh<S>,
    mode: RenderModeController,
    wave: WaveMotion,
    wave_controller: WaveController,
    elapsed_s: f32,
}

impl<S: SpectrumSource> Visualizer<S> {
    pub fn new(
        mesh_params: MeshParams,
        wave_params: WaveParams,
        increments: WaveIncrements,
        marker_start: Vec3,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mesh: SpectrumMesh::new(mesh_params)?,
            mode: RenderModeController::default(),
            wave: WaveMotion::new(marker_start, wave_params),
            wave_controller: WaveController::new(increments),
            elapsed_s: 0.0,
        })
    }

    pub fn render_mode(&self) -> &RenderModeController {
        &self.mode
    }

    pub fn wave(&self) -> &WaveMotion {
        &self.wave
    }

    pub fn elapsed_s(&self) -> f32 {
        self.elapsed_s
    }

    /// Advance one frame.
    ///
    /// Input events apply first, then the mesh pipeline runs (skipped when no
    /// spectrum source is attached), then the marker position is sampled at
    /// the new elapsed time.
    pub fn tick(&mut self, delta_s: f32, events: &[InputEvent]) -> FrameState {
        for event in events {
            match *event {
                InputEvent::ToggleRenderMode => {
                    self.mode.toggle();
                }
                InputEvent::BumpWave(trigger) => {
                    self.wave_controller.apply(trigger, &mut self.wave);
                }
            }
        }

        self.elapsed_s += delta_s.max(0.0);

        let mesh_updated = self.mesh.update();
        if !mesh_updated {
            log::debug!("No spectrum source attached, skipping mesh update");
        }

        FrameState {
            mesh_updated,
            binding: self.mode.binding(),
            marker_position: self.wave.position(self.elapsed_s),
            elapsed_s: self.elapsed_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FixedSpectrum;
    use crate::rendering::{Material, Topology};
    use crate::wave::WaveTrigger;

    fn visualizer() -> Visualizer<FixedSpectrum> {
        Visualizer::new(
            MeshParams::default(),
            WaveParams::default(),
            WaveIncrements::default(),
            Vec3::new(0.0, 0.5, 0.5),
        )
        .unwrap()
    }

    #[test]
    fn test_tick_without_source_still_toggles() {
        let mut vis = visualizer();
        let before = vis.mesh.grid.vertices.clone();

        let frame = vis.tick(0.016, &[InputEvent::ToggleRenderMode]);

        assert!(!frame.mesh_updated);
        assert_eq!(vis.mesh.grid.vertices, before);
        assert_eq!(frame.binding.topology, Topology::Lines);
        assert_eq!(frame.binding.material, Material::Wireframe);
    }

    #[test]
    fn test_tick_with_source_updates_mesh() {
        let mut vis = visualizer();
        vis.mesh.attach_source(FixedSpectrum::new(vec![0.02]));

        let frame = vis.tick(0.016, &[]);

        assert!(frame.mesh_updated);
        assert!(vis.mesh.grid.vertices.iter().all(|v| v.height() == 1.0));
        assert_eq!(frame.binding.topology, Topology::Triangles);
    }

    #[test]
    fn test_elapsed_time_drives_marker() {
        let mut vis = visualizer();

        vis.tick(0.5, &[]);
        let frame = vis.tick(0.5, &[]);

        assert_eq!(frame.elapsed_s, 1.0);
        assert_eq!(frame.marker_position, vis.wave().position(1.0));
        // Default speed of 1 unit/s along X
        assert!((frame.marker_position.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_delta_does_not_rewind() {
        let mut vis = visualizer();
        vis.tick(1.0, &[]);
        vis.tick(-5.0, &[]);
        assert_eq!(vis.elapsed_s(), 1.0);
    }

    #[test]
    fn test_wave_events_apply_before_sampling() {
        let mut vis = visualizer();
        let base = vis.wave().params();

        vis.tick(
            0.0,
            &[
                InputEvent::BumpWave(WaveTrigger::Speed),
                InputEvent::BumpWave(WaveTrigger::Speed),
            ],
        );

        let speed = vis.wave().params().speed;
        assert!((speed - (base.speed + 0.2)).abs() < 1e-6);
        assert_eq!(vis.wave().params().amplitude, base.amplitude);
    }
}
