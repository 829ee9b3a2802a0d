//! Audio system: plays the source clip and keeps a live spectrum snapshot.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::fft::spawn_analysis_thread;
use super::player::{GlicolPlayer, LoopedClip, Player};
use super::source::SpectrumSource;
use crate::error::AudioError;
use crate::params::{audio_constants::OUTPUT_LIMIT, SourceClip, SpectrumConfig};

/// Audio system managing playback and spectrum analysis
pub struct AudioSystem {
    /// Latest spectrum published by the analysis thread
    shared_spectrum: Arc<Mutex<Vec<f32>>>,

    /// Frame-local copy handed to readers
    samples: Vec<f32>,

    /// Cleared on drop to stop the analysis thread
    running: Arc<AtomicBool>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    analysis_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Open the output device, start playback and the analysis thread
    pub fn new(config: SpectrumConfig) -> Result<Self, AudioError> {
        config.validate()?;

        let host = cpal::default_host();
        let device = match &config.mixer_route {
            Some(route) => host
                .output_devices()?
                .find(|d| d.name().map(|n| &n == route).unwrap_or(false))
                .ok_or_else(|| AudioError::DeviceNotFound(route.clone()))?,
            None => host
                .default_output_device()
                .ok_or(AudioError::NoOutputDevice)?,
        };

        let supported = device.default_output_config()?;
        let sample_rate_hz = match supported.sample_rate().0 {
            0 => config.sample_rate_hz as u32,
            rate => rate,
        };
        let channels = supported.channels().max(1) as usize;
        let sample_format = supported.sample_format();

        log::info!(
            "Audio: {} @ {}Hz ({:?}), {} channel(s), source: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate_hz,
            sample_format,
            channels,
            config.source_clip
        );
        log::info!(
            "Spectrum: {} bins, {:.2} Hz per bin",
            config.spectrum_size,
            config.bin_width_hz(sample_rate_hz as usize)
        );

        let player = match &config.source_clip {
            SourceClip::Glicol => Player::Glicol(GlicolPlayer::new(sample_rate_hz as usize)?),
            SourceClip::Wav(path) => Player::Clip(LoopedClip::load(path, sample_rate_hz)?),
        };

        // Shared state between audio callback and analysis thread
        let history_len = config.fft_size();
        let history = Arc::new(Mutex::new(VecDeque::with_capacity(history_len)));
        let output = OutputState::new(player, Arc::clone(&history), history_len, channels);

        let shared_spectrum = Arc::new(Mutex::new(vec![0.0; config.spectrum_size]));
        let running = Arc::new(AtomicBool::new(true));

        let mut stream_config = supported.config();
        stream_config.sample_rate = cpal::SampleRate(sample_rate_hz);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, output)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, output)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, output)?,
            other => return Err(AudioError::UnsupportedSampleFormat(other)),
        };

        stream.play()?;

        let analysis_thread = spawn_analysis_thread(
            config.spectrum_size,
            Duration::from_millis(config.update_interval_ms),
            history,
            Arc::clone(&shared_spectrum),
            Arc::clone(&running),
        );

        Ok(Self {
            shared_spectrum,
            samples: vec![0.0; config.spectrum_size],
            running,
            _stream: stream,
            analysis_thread: Some(analysis_thread),
        })
    }
}

/// State owned by the output callback
struct OutputState {
    player: Player,
    history: Arc<Mutex<VecDeque<f32>>>,
    history_len: usize,
    frame: Vec<f32>,
}

impl OutputState {
    fn new(
        player: Player,
        history: Arc<Mutex<VecDeque<f32>>>,
        history_len: usize,
        channels: usize,
    ) -> Self {
        Self {
            player,
            history,
            history_len,
            frame: vec![0.0; channels.max(1)],
        }
    }

    /// Fill an interleaved device buffer and record the played mono mix
    fn fill<T: Sample + FromSample<f32>>(&mut self, data: &mut [T]) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);

        for out in data.chunks_mut(self.frame.len()) {
            let (left, right) = self.player.next_frame();

            // Safety limiter: hard clip to prevent ear damage
            let left = left.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
            let right = right.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
            write_frame(&mut self.frame, left, right);

            for (sample, value) in out.iter_mut().zip(&self.frame) {
                *sample = T::from_sample(*value);
            }

            if history.len() == self.history_len {
                history.pop_front();
            }
            history.push_back((left + right) * 0.5);
        }
    }
}

/// Open an output stream in the device's native sample type
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut output: OutputState,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32> + 'static,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| output.fill(data),
        |err| log::error!("Audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

impl SpectrumSource for AudioSystem {
    fn refresh(&mut self) {
        let shared = self
            .shared_spectrum
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.samples.copy_from_slice(&shared);
    }

    fn samples(&self) -> &[f32] {
        &self.samples
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.analysis_thread.take() {
            if handle.join().is_err() {
                log::warn!("Spectrum analysis thread panicked");
            }
        }
    }
}

/// Write a stereo frame into an interleaved output frame of any width
fn write_frame(frame: &mut [f32], left: f32, right: f32) {
    match frame {
        [mono] => *mono = (left + right) * 0.5,
        [l, r, rest @ ..] => {
            *l = left;
            *r = right;
            rest.fill(0.0);
        }
        [] => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_frame_layouts() {
        let mut mono = [1.0];
        write_frame(&mut mono, 0.2, 0.4);
        assert!((mono[0] - 0.3).abs() < 1e-6);

        let mut stereo = [0.0; 2];
        write_frame(&mut stereo, 0.2, 0.4);
        assert_eq!(stereo, [0.2, 0.4]);

        let mut surround = [1.0; 6];
        write_frame(&mut surround, 0.2, 0.4);
        assert_eq!(surround, [0.2, 0.4, 0.0, 0.0, 0.0, 0.0]);
    }

    fn constant_output(level: f32, channels: usize, history_len: usize) -> OutputState {
        let clip = LoopedClip::new(vec![level], 44100, 44100);
        let history = Arc::new(Mutex::new(VecDeque::new()));
        OutputState::new(Player::Clip(clip), history, history_len, channels)
    }

    #[test]
    fn test_fill_converts_to_integer_formats() {
        let mut output = constant_output(0.25, 2, 8);

        let mut signed = [0i16; 4];
        output.fill(&mut signed);
        assert_eq!(signed, [i16::from_sample(0.25f32); 4]);
        assert!(signed[0] > 0);

        let mut unsigned = [0u16; 4];
        output.fill(&mut unsigned);
        assert_eq!(unsigned, [u16::from_sample(0.25f32); 4]);
        assert!(unsigned[0] > u16::EQUILIBRIUM);

        let history = output.history.lock().unwrap();
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_fill_limits_output_and_bounds_history() {
        let mut output = constant_output(2.0, 1, 3);

        let mut data = [0.0f32; 5];
        output.fill(&mut data);

        assert!(data.iter().all(|&s| s == OUTPUT_LIMIT));
        assert_eq!(output.history.lock().unwrap().len(), 3);
    }
}
