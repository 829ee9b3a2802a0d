//! Spectrum mesh grid resolution and height mapping parameters.

use crate::error::ConfigError;

/// How the smoother treats the 2-vertex border around the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Border vertices keep their raw spectrum height
    #[default]
    Raw,

    /// Every vertex is smoothed; samples past the edge reuse the nearest edge vertex
    Clamped,
}

/// Spectrum mesh parameters
#[derive(Debug, Clone)]
pub struct MeshParams {
    /// Grid cells along X (vertices per row = x_size + 1)
    pub x_size: usize,

    /// Grid cells along Y (rows = y_size + 1)
    pub y_size: usize,

    /// Gain applied to each spectrum bin before clamping to [0, 1]
    /// Spectrum magnitudes are small (~0.01), hence the large default
    pub sample_multiplier: f32,

    /// Height amplitude (world units at full clamp)
    pub amplitude: f32,

    /// Extra height scale, multiplied with `amplitude`
    pub scale: f32,

    /// Border handling for the Gaussian smoothing pass
    pub edge_mode: EdgeMode,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            x_size: 10,
            y_size: 10,
            sample_multiplier: 100.0,
            amplitude: 1.0,
            scale: 1.0,
            edge_mode: EdgeMode::Raw,
        }
    }
}

impl MeshParams {
    /// Maximum height a vertex can reach
    pub fn max_height(&self) -> f32 {
        self.amplitude * self.scale
    }

    /// Validate grid resolution and scaling factors
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_size == 0 || self.y_size == 0 {
            return Err(ConfigError::InvalidGridSize {
                x_size: self.x_size,
                y_size: self.y_size,
            });
        }
        for (name, value) in [
            ("sample_multiplier", self.sample_multiplier),
            ("amplitude", self.amplitude),
            ("scale", self.scale),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = MeshParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.max_height(), 1.0);
        assert_eq!(params.edge_mode, EdgeMode::Raw);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let params = MeshParams {
            x_size: 0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidGridSize {
                x_size: 0,
                y_size: 10
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_gain() {
        let params = MeshParams {
            sample_multiplier: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonFinite {
                name: "sample_multiplier",
                ..
            })
        ));
    }
}
