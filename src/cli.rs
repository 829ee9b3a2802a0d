//! Command-line argument parsing.

use clap::Parser;

use crate::params::{
    EdgeMode, MeshParams, RenderConfig, SourceClip, SpectrumConfig, WaveIncrements, WaveParams,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Spectromesh")]
#[command(about = "Audio-reactive spectrum mesh visualizer", long_about = None)]
pub struct Args {
    /// Grid cells along X
    #[arg(long, value_name = "CELLS", default_value_t = 10)]
    pub x_size: usize,

    /// Grid cells along Y
    #[arg(long, value_name = "CELLS", default_value_t = 10)]
    pub y_size: usize,

    /// Gain applied to each spectrum bin before clamping
    #[arg(long, value_name = "GAIN", default_value_t = 100.0)]
    pub sample_multiplier: f32,

    /// Height amplitude at full clamp
    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f32,

    /// Extra height scale
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Border smoothing: raw (default) or clamped
    #[arg(long, value_name = "MODE", default_value = "raw")]
    pub edge_mode: String,

    /// Spectrum bins per frame (power of two)
    #[arg(long, value_name = "BINS", default_value_t = 2048)]
    pub spectrum_size: usize,

    /// Audio source: "glicol" or a path to a WAV file
    #[arg(long, value_name = "CLIP", default_value = "glicol")]
    pub source: String,

    /// Output device name (defaults to the host default device)
    #[arg(long, value_name = "DEVICE")]
    pub mixer_route: Option<String>,

    /// Amount added per amplitude key press (A)
    #[arg(long, default_value_t = 0.1)]
    pub amplitude_increment: f32,

    /// Amount added per frequency key press (F)
    #[arg(long, default_value_t = 0.1)]
    pub frequency_increment: f32,

    /// Amount added per speed key press (S)
    #[arg(long, default_value_t = 0.1)]
    pub speed_increment: f32,

    /// Amount added per offset key press (O)
    #[arg(long, default_value_t = 0.1)]
    pub offset_increment: f32,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,
}

impl Args {
    /// Parse edge mode from command-line arguments
    pub fn parse_edge_mode(&self) -> EdgeMode {
        match self.edge_mode.to_lowercase().as_str() {
            "raw" => EdgeMode::Raw,
            "clamped" => EdgeMode::Clamped,
            other => {
                log::warn!("Unknown edge mode '{}', using raw", other);
                EdgeMode::Raw
            }
        }
    }

    pub fn mesh_params(&self) -> MeshParams {
        MeshParams {
            x_size: self.x_size,
            y_size: self.y_size,
            sample_multiplier: self.sample_multiplier,
            amplitude: self.amplitude,
            scale: self.scale,
            edge_mode: self.parse_edge_mode(),
        }
    }

    pub fn spectrum_config(&self) -> SpectrumConfig {
        SpectrumConfig {
            spectrum_size: self.spectrum_size,
            source_clip: SourceClip::parse(&self.source),
            mixer_route: self.mixer_route.clone(),
            ..Default::default()
        }
    }

    pub fn wave_increments(&self) -> WaveIncrements {
        WaveIncrements {
            amplitude: self.amplitude_increment,
            frequency: self.frequency_increment,
            speed: self.speed_increment,
            offset: self.offset_increment,
        }
    }

    pub fn wave_params(&self) -> WaveParams {
        WaveParams::default()
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["spectromesh"]);
        let mesh = args.mesh_params();
        let defaults = MeshParams::default();

        assert_eq!(mesh.x_size, defaults.x_size);
        assert_eq!(mesh.y_size, defaults.y_size);
        assert_eq!(mesh.sample_multiplier, defaults.sample_multiplier);
        assert_eq!(mesh.edge_mode, EdgeMode::Raw);
        assert_eq!(args.wave_increments(), WaveIncrements::default());

        let spectrum = args.spectrum_config();
        assert_eq!(spectrum.spectrum_size, 2048);
        assert_eq!(spectrum.source_clip, SourceClip::Glicol);
        assert_eq!(spectrum.mixer_route, None);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "spectromesh",
            "--x-size",
            "64",
            "--y-size",
            "32",
            "--edge-mode",
            "Clamped",
            "--source",
            "loop.wav",
            "--mixer-route",
            "Speakers",
            "--speed-increment",
            "0.5",
        ]);

        let mesh = args.mesh_params();
        assert_eq!((mesh.x_size, mesh.y_size), (64, 32));
        assert_eq!(mesh.edge_mode, EdgeMode::Clamped);

        let spectrum = args.spectrum_config();
        assert_eq!(spectrum.source_clip, SourceClip::parse("loop.wav"));
        assert_eq!(spectrum.mixer_route.as_deref(), Some("Speakers"));
        assert_eq!(args.wave_increments().speed, 0.5);
    }

    #[test]
    fn test_unknown_edge_mode_falls_back() {
        let args = Args::parse_from(["spectromesh", "--edge-mode", "mirror"]);
        assert_eq!(args.parse_edge_mode(), EdgeMode::Raw);
    }
}
