//! Audio playback and spectrum analysis.
//!
//! Plays a looping source (Glicol composition or WAV clip) through cpal and
//! keeps a Blackman-Harris windowed magnitude spectrum up to date on a
//! background thread. The mesh pipeline reads it through [`SpectrumSource`].

mod fft;
mod player;
mod source;
mod system;

// Re-export public types
pub use fft::{blackman_harris_window, SpectrumAnalyzer};
pub use player::{LoopedClip, GLICOL_COMPOSITION};
pub use source::{FixedSpectrum, SilentSpectrum, SpectrumSource};
pub use system::AudioSystem;
