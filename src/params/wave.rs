//! Wave motion parameters and per-trigger increments.

/// Oscillator parameters for the wave-driven marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Vertical swing (world units)
    pub amplitude: f32,

    /// Angular frequency (radians per second)
    pub frequency: f32,

    /// Horizontal drift along +X (world units per second)
    pub speed: f32,

    /// Phase offset (radians)
    pub offset: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 1.0,
            speed: 1.0,
            offset: 0.0,
        }
    }
}

/// Amount added to one wave parameter per key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveIncrements {
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    pub offset: f32,
}

impl Default for WaveIncrements {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 0.1,
            speed: 0.1,
            offset: 0.1,
        }
    }
}
