//! Spectromesh - a grid mesh that rises and falls with the music
//!
//! Every frame the playing audio is analysed into a spectrum, mapped onto
//! vertex heights and blurred with a small Gaussian. Space flips between the
//! solid and wireframe looks; A, F, S and O nudge the sine-wave marker.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use glam::{Mat4, Vec3};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use spectromesh::audio::AudioSystem;
use spectromesh::camera::CameraSystem;
use spectromesh::cli::Args;
use spectromesh::input::InputEvent;
use spectromesh::params::{FixedCamera, RenderConfig, SpectrumConfig};
use spectromesh::rendering::{RenderSystem, Uniforms};
use spectromesh::visualizer::Visualizer;

/// Where the wave marker sits at t = 0
const MARKER_START: Vec3 = Vec3::new(0.0, 0.5, 0.5);

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    visualizer: Visualizer<AudioSystem>,
    camera: CameraSystem,

    // Configuration
    render_config: RenderConfig,
    spectrum_config: SpectrumConfig,

    // Input collected since the last frame
    pending_events: Vec<InputEvent>,
    last_frame: Instant,
}

impl App {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let visualizer = Visualizer::new(
            args.mesh_params(),
            args.wave_params(),
            args.wave_increments(),
            MARKER_START,
        )
        .context("invalid mesh parameters")?;

        let spectrum_config = args.spectrum_config();
        spectrum_config
            .validate()
            .context("invalid spectrum parameters")?;

        Ok(Self {
            window: None,
            render_system: None,
            visualizer,
            camera: CameraSystem::new(FixedCamera::default()),
            render_config: args.render_config(),
            spectrum_config,
            pending_events: Vec::new(),
            last_frame: Instant::now(),
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Spectromesh")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.visualizer.mesh.grid,
        ))
        .context("failed to initialise renderer")?;

        // The mesh stays flat without audio, everything else keeps running
        match AudioSystem::new(self.spectrum_config.clone()) {
            Ok(audio) => self.visualizer.mesh.attach_source(audio),
            Err(e) => log::warn!("Audio unavailable, mesh will stay flat: {}", e),
        }

        let size = window.inner_size();
        self.render_config.window_width = size.width;
        self.render_config.window_height = size.height;

        log::info!("Spectromesh is running (Space: toggle mode, A/F/S/O: wave, Esc: quit)");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
        Ok(())
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let now = Instant::now();
        let delta_s = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let events = std::mem::take(&mut self.pending_events);
        let frame = self.visualizer.tick(delta_s, &events);

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        if frame.mesh_updated {
            render_system.upload_mesh(&self.visualizer.mesh.grid);
        }

        let (view_proj, _) = self.camera.create_view_proj_matrix(&self.render_config);
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: self.render_config.wireframe_color,
            max_height: self.visualizer.mesh.params().max_height(),
            uv_depth: 1.0,
            _padding: [0.0; 2],
        };
        render_system.update_uniforms(&uniforms, frame.marker_position);

        match render_system.render(frame.binding) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("{:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.render_config.window_width = size.width;
                    self.render_config.window_height = size.height;
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if let Some(input) = InputEvent::from_key(code) {
                    self.pending_events.push(input);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Spectromesh - audio-reactive spectrum mesh");
    log::info!(
        "Grid {}x{}, spectrum {} bins, source {}",
        args.x_size,
        args.y_size,
        args.spectrum_size,
        args.spectrum_config().source_clip
    );

    let mut app = App::new(&args)?;
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
