//! Looping audio sources played into the output stream.

use glicol::Engine;
use std::path::Path;

use crate::error::AudioError;
use crate::params::audio_constants::BLOCK_SIZE;

/// Glicol composition (procedural music code)
pub const GLICOL_COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 60 _60 _~a 48
~a: choose 48 48 48 72 0 0 0
~amp: ~gate >> envperc 0.001 0.1
~pit: ~gate >> mul 261.63
~lead: saw ~pit >> mul ~amp >> lpf ~mod 5.0 >> mul 0.1
~mod: sin 0.2 >> mul 1300 >> add 1500
o: ~lead >> plate 0.1
"#;

/// Source of stereo frames for the audio callback
pub enum Player {
    Glicol(GlicolPlayer),
    Clip(LoopedClip),
}

impl Player {
    /// Next (left, right) frame
    pub fn next_frame(&mut self) -> (f32, f32) {
        match self {
            Self::Glicol(player) => player.next_frame(),
            Self::Clip(clip) => {
                let sample = clip.next_sample();
                (sample, sample)
            }
        }
    }
}

/// Glicol engine rendered one block at a time
pub struct GlicolPlayer {
    engine: Engine<BLOCK_SIZE>,
    block: [[f32; BLOCK_SIZE]; 2],
    cursor: usize,
}

impl GlicolPlayer {
    pub fn new(sample_rate_hz: usize) -> Result<Self, AudioError> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate_hz);
        engine.update_with_code(GLICOL_COMPOSITION);
        engine
            .update()
            .map_err(|e| AudioError::Glicol(format!("{:?}", e)))?;

        Ok(Self {
            engine,
            block: [[0.0; BLOCK_SIZE]; 2],
            cursor: BLOCK_SIZE,
        })
    }

    fn next_frame(&mut self) -> (f32, f32) {
        if self.cursor == BLOCK_SIZE {
            let (buffers, _) = self.engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                self.block[0][i] = buffers[0][i];
                self.block[1][i] = buffers[1][i];
            }
            self.cursor = 0;
        }

        let frame = (self.block[0][self.cursor], self.block[1][self.cursor]);
        self.cursor += 1;
        frame
    }
}

/// Mono clip decoded up front and played on repeat
#[derive(Debug, Clone)]
pub struct LoopedClip {
    samples: Vec<f32>,
    /// Clip samples advanced per output sample (clip rate / device rate)
    step: f64,
    position: f64,
}

impl LoopedClip {
    /// Build a clip from mono samples recorded at `clip_rate_hz`, resampled
    /// on the fly to `output_rate_hz`
    pub fn new(samples: Vec<f32>, clip_rate_hz: u32, output_rate_hz: u32) -> Self {
        Self {
            samples,
            step: clip_rate_hz as f64 / output_rate_hz.max(1) as f64,
            position: 0.0,
        }
    }

    /// Decode a WAV file with hound and mix it down to mono
    pub fn load(path: &Path, output_rate_hz: u32) -> Result<Self, AudioError> {
        let clip_err = |source| AudioError::Clip {
            path: path.display().to_string(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(clip_err)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(clip_err)?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()
                    .map_err(clip_err)?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let mono: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        if mono.is_empty() {
            return Err(AudioError::EmptyClip(path.display().to_string()));
        }

        log::info!(
            "Clip: {} ({} Hz, {} ch, {:.1}s)",
            path.display(),
            spec.sample_rate,
            spec.channels,
            mono.len() as f32 / spec.sample_rate as f32
        );

        Ok(Self::new(mono, spec.sample_rate, output_rate_hz))
    }

    /// Next sample, linearly interpolated and wrapping at the end of the clip
    pub fn next_sample(&mut self) -> f32 {
        let len = self.samples.len();
        if len == 0 {
            return 0.0;
        }

        let index = self.position as usize % len;
        let frac = (self.position - self.position.floor()) as f32;
        let current = self.samples[index];
        let next = self.samples[(index + 1) % len];

        self.position = (self.position + self.step) % len as f64;

        current + (next - current) * frac
    }
}
