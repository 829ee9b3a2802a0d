//! Spectrum-to-height mapping.

use super::grid::Vertex;
use crate::audio::SpectrumSource;
use crate::params::MeshParams;

/// Write one height per vertex from a cyclically sampled spectrum.
///
/// Vertex `i` reads `spectrum[i % spectrum.len()]`, so grids with more
/// vertices than bins repeat the spectrum instead of running out. Each sample
/// is multiplied by `sample_multiplier`, clamped to [0, 1] (NaN maps to 0) and
/// scaled by `amplitude * scale`. An empty spectrum is treated as silence.
pub fn apply_spectrum(
    vertices: &mut [Vertex],
    spectrum: &[f32],
    sample_multiplier: f32,
    amplitude: f32,
    scale: f32,
) {
    let peak = amplitude * scale;

    if spectrum.is_empty() {
        for vertex in vertices.iter_mut() {
            vertex.position[1] = 0.0;
        }
        return;
    }

    for (i, vertex) in vertices.iter_mut().enumerate() {
        let sample = spectrum[i % spectrum.len()] * sample_multiplier;
        // f32::max discards NaN
        vertex.position[1] = peak * sample.max(0.0).min(1.0);
    }
}

/// Owns a spectrum source and writes its output into the mesh each frame
pub struct SpectralHeightMapper<S> {
    source: S,
    sample_multiplier: f32,
    amplitude: f32,
    scale: f32,
}

impl<S: SpectrumSource> SpectralHeightMapper<S> {
    pub fn new(source: S, params: &MeshParams) -> Self {
        Self {
            source,
            sample_multiplier: params.sample_multiplier,
            amplitude: params.amplitude,
            scale: params.scale,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Refresh the source, then overwrite every vertex height from it
    pub fn write_heights(&mut self, vertices: &mut [Vertex]) {
        self.source.refresh();
        apply_spectrum(
            vertices,
            self.source.samples(),
            self.sample_multiplier,
            self.amplitude,
            self.scale,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FixedSpectrum;
    use crate::mesh::HeightFieldGrid;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32 * 0.003).collect()
    }

    #[test]
    fn test_heights_bounded() {
        let mut grid = HeightFieldGrid::new(12, 9).unwrap();
        let spectrum = ramp(17);

        apply_spectrum(&mut grid.vertices, &spectrum, 100.0, 2.0, 1.5);

        assert!(grid
            .vertices
            .iter()
            .all(|v| (0.0..=3.0).contains(&v.height())));
        // Bin 16 * 0.003 * 100 = 4.8 saturates at amplitude * scale
        assert_eq!(grid.vertices[16].height(), 3.0);
        assert_eq!(grid.vertices[0].height(), 0.0);
    }

    #[test]
    fn test_cyclic_consistency() {
        let mut grid = HeightFieldGrid::new(20, 20).unwrap();
        let spectrum = ramp(7);

        apply_spectrum(&mut grid.vertices, &spectrum, 10.0, 1.0, 1.0);

        let len = spectrum.len();
        for i in 0..grid.vertices.len() {
            for j in (i % len..grid.vertices.len()).step_by(len) {
                assert_eq!(grid.vertices[i].height(), grid.vertices[j].height());
            }
        }
    }

    #[test]
    fn test_spectrum_longer_than_grid() {
        let mut grid = HeightFieldGrid::new(2, 2).unwrap();
        let spectrum = vec![0.005; 2048];

        apply_spectrum(&mut grid.vertices, &spectrum, 100.0, 1.0, 1.0);
        assert!(grid
            .vertices
            .iter()
            .all(|v| (v.height() - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_negative_and_nan_samples_clamp_to_zero() {
        let mut grid = HeightFieldGrid::new(1, 1).unwrap();
        let spectrum = vec![-1.0, f32::NAN, f32::INFINITY, 0.001];

        apply_spectrum(&mut grid.vertices, &spectrum, 100.0, 1.0, 1.0);

        let heights: Vec<f32> = grid.vertices.iter().map(Vertex::height).collect();
        assert_eq!(heights[0], 0.0);
        assert_eq!(heights[1], 0.0);
        assert_eq!(heights[2], 1.0);
        assert!((heights[3] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_empty_spectrum_is_silence() {
        let mut grid = HeightFieldGrid::new(3, 3).unwrap();
        for vertex in &mut grid.vertices {
            vertex.position[1] = 0.7;
        }

        apply_spectrum(&mut grid.vertices, &[], 100.0, 1.0, 1.0);
        assert!(grid.vertices.iter().all(|v| v.height() == 0.0));
    }

    #[test]
    fn test_mapper_refreshes_before_writing() {
        let params = MeshParams::default();
        let mut grid = HeightFieldGrid::new(params.x_size, params.y_size).unwrap();
        let mut mapper = SpectralHeightMapper::new(FixedSpectrum::new(vec![0.002]), &params);

        mapper.write_heights(&mut grid.vertices);
        assert_eq!(mapper.source().refreshes(), 1);
        assert!(grid
            .vertices
            .iter()
            .all(|v| (v.height() - 0.2).abs() < 1e-6));

        mapper.source_mut().set_bins(vec![0.0]);
        mapper.write_heights(&mut grid.vertices);
        assert_eq!(mapper.into_source().refreshes(), 2);
        assert!(grid.vertices.iter().all(|v| v.height() == 0.0));
    }
}
