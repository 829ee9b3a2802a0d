//! Windowed magnitude spectrum analysis and the background analysis thread.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// 4-term Blackman-Harris window coefficient (periodic form)
pub fn blackman_harris_window(index: usize, size: usize) -> f32 {
    const A0: f32 = 0.35875;
    const A1: f32 = 0.48829;
    const A2: f32 = 0.14128;
    const A3: f32 = 0.01168;

    let x = 2.0 * PI * index as f32 / size as f32;
    A0 - A1 * x.cos() + A2 * (2.0 * x).cos() - A3 * (3.0 * x).cos()
}

/// Turns the newest block of audio samples into `spectrum_size` magnitude bins
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    window_sum: f32,
    buffer: Vec<Complex<f32>>,
    spectrum_size: usize,
}

impl SpectrumAnalyzer {
    /// Plan a transform of `2 * spectrum_size` samples
    pub fn new(spectrum_size: usize) -> Self {
        let fft_size = spectrum_size * 2;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window: Vec<f32> = (0..fft_size)
            .map(|i| blackman_harris_window(i, fft_size))
            .collect();
        let window_sum = window.iter().sum::<f32>().max(f32::EPSILON);

        Self {
            fft,
            window,
            window_sum,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            spectrum_size,
        }
    }

    pub fn spectrum_size(&self) -> usize {
        self.spectrum_size
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Analyse the newest `fft_size` samples of `samples` into `out`.
    ///
    /// Shorter input is zero-padded at the oldest end. `out` must hold
    /// `spectrum_size` values; magnitudes are normalised by the window sum so a
    /// full-scale sine peaks near 0.5.
    pub fn process(&mut self, samples: &[f32], out: &mut [f32]) {
        let fft_size = self.fft_size();
        let available = samples.len().min(fft_size);
        let pad = fft_size - available;
        let recent = &samples[samples.len() - available..];

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        for (bin, value) in out.iter_mut().zip(&self.buffer[..self.spectrum_size]) {
            *bin = value.norm() / self.window_sum;
        }
    }
}

/// Spawn the analysis thread.
///
/// Every `interval` it snapshots the sample history, runs the analyzer and
/// publishes the result into `spectrum`. Exits once `running` goes false.
pub fn spawn_analysis_thread(
    spectrum_size: usize,
    interval: Duration,
    history: Arc<Mutex<VecDeque<f32>>>,
    spectrum: Arc<Mutex<Vec<f32>>>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut analyzer = SpectrumAnalyzer::new(spectrum_size);
        let mut samples = Vec::with_capacity(analyzer.fft_size());
        let mut bins = vec![0.0; spectrum_size];

        while running.load(Ordering::Relaxed) {
            thread::sleep(interval);

            {
                let history = history.lock().unwrap_or_else(PoisonError::into_inner);
                samples.clear();
                samples.extend(history.iter().copied());
            }

            analyzer.process(&samples, &mut bins);

            spectrum
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .copy_from_slice(&bins);
        }
    })
}
