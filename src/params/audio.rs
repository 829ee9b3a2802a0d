//! Spectrum analysis and audio routing configuration.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Audio content fed to the output stream and analysed every frame
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SourceClip {
    /// Built-in procedural Glicol composition
    #[default]
    Glicol,

    /// WAV file decoded once and looped
    Wav(PathBuf),
}

impl SourceClip {
    /// Parse a clip identifier: `glicol` or a path to a `.wav` file
    pub fn parse(id: &str) -> Self {
        if id.eq_ignore_ascii_case("glicol") {
            Self::Glicol
        } else {
            Self::Wav(PathBuf::from(id))
        }
    }
}

impl fmt::Display for SourceClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glicol => write!(f, "glicol"),
            Self::Wav(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Spectrum analysis configuration
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Number of magnitude bins handed to the mesh (must be power of 2).
    /// The transform itself runs over twice this many samples.
    pub spectrum_size: usize,

    /// Sample rate used when the device does not dictate one (Hz)
    pub sample_rate_hz: usize,

    /// Analysis thread cadence (milliseconds, ~60 Hz by default)
    pub update_interval_ms: u64,

    /// Audio content to play and analyse
    pub source_clip: SourceClip,

    /// Output device name; `None` routes to the host default device
    pub mixer_route: Option<String>,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            spectrum_size: 2048,
            sample_rate_hz: 44100,
            update_interval_ms: 16,
            source_clip: SourceClip::default(),
            mixer_route: None,
        }
    }
}

impl SpectrumConfig {
    /// Length of the windowed transform (two samples per output bin)
    pub fn fft_size(&self) -> usize {
        self.spectrum_size * 2
    }

    /// Frequency covered by a single output bin (Hz)
    pub fn bin_width_hz(&self, sample_rate_hz: usize) -> f32 {
        sample_rate_hz as f32 / self.fft_size() as f32
    }

    /// Validate configuration (spectrum size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spectrum_size == 0 || !self.spectrum_size.is_power_of_two() {
            return Err(ConfigError::InvalidSpectrumSize(self.spectrum_size));
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Safety limiter applied to every output sample
    pub const OUTPUT_LIMIT: f32 = 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SpectrumConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fft_size(), 4096);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let config = SpectrumConfig {
            spectrum_size: 1000,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSpectrumSize(1000))
        );

        let config = SpectrumConfig {
            spectrum_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let config = SpectrumConfig {
            sample_rate_hz: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSampleRate));
    }

    #[test]
    fn test_bin_width() {
        let config = SpectrumConfig::default();
        // 44100 Hz over a 4096-point transform ≈ 10.77 Hz per bin
        assert!((config.bin_width_hz(44100) - 10.766).abs() < 0.01);
    }

    #[test]
    fn test_source_clip_parse() {
        assert_eq!(SourceClip::parse("glicol"), SourceClip::Glicol);
        assert_eq!(SourceClip::parse("GLICOL"), SourceClip::Glicol);
        assert_eq!(
            SourceClip::parse("music/loop.wav"),
            SourceClip::Wav(PathBuf::from("music/loop.wav"))
        );
    }
}
