//! Presentation: render mode state and the wgpu backend.

mod mode;
mod system;

// Re-export public types
pub use mode::{Material, RenderBinding, RenderMode, RenderModeController, Topology};
pub use system::{RenderSystem, Uniforms};
