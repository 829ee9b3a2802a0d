//! Error types shared across the visualizer.

use thiserror::Error;

/// Rejected configuration values, caught before any buffer is built
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be at least 1x1, got {x_size}x{y_size}")]
    InvalidGridSize { x_size: usize, y_size: usize },

    #[error("grid of {x_size}x{y_size} cells exceeds the 32-bit index range")]
    GridTooLarge { x_size: usize, y_size: usize },

    #[error("spectrum size must be a power of two, got {0}")]
    InvalidSpectrumSize(usize),

    #[error("sample rate must be > 0")]
    InvalidSampleRate,

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
}

/// Failures while bringing up the audio backend
#[derive(Debug, Error)]
pub enum AudioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("audio output device '{0}' not found")]
    DeviceNotFound(String),

    #[error("failed to query audio devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to get audio config: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported output sample format: {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("glicol engine init failed: {0}")]
    Glicol(String),

    #[error("failed to read clip '{path}': {source}")]
    Clip {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("clip '{0}' contains no samples")]
    EmptyClip(String),
}

/// Failures while creating the GPU render backend
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
