//! Parameter definitions with documented units and defaults.
//!
//! Every tunable lives here as a plain struct with a `Default` impl:
//! - Grid resolution and height scaling
//! - Spectrum analysis and audio routing
//! - Wave motion and its per-key increments
//! - Window and camera setup

mod audio;
mod camera;
mod mesh;
mod render;
mod wave;

// Re-export all types
pub use audio::{audio_constants, SourceClip, SpectrumConfig};
pub use camera::FixedCamera;
pub use mesh::{EdgeMode, MeshParams};
pub use render::RenderConfig;
pub use wave::{WaveIncrements, WaveParams};
