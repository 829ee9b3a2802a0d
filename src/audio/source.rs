//! Per-frame spectrum access for the mesh pipeline.

/// A fixed-size magnitude spectrum refreshed once per frame.
///
/// Implementors own the spectrum buffer; readers borrow it until the next
/// `refresh`. A source with no signal reports all zeros, never an error.
pub trait SpectrumSource {
    /// Pull the newest spectrum into the internal buffer
    fn refresh(&mut self);

    /// Spectrum from the last `refresh` (all zeros before the first one)
    fn samples(&self) -> &[f32];

    /// Owned copy of the current spectrum, for holding past the frame
    fn snapshot(&self) -> Vec<f32> {
        self.samples().to_vec()
    }
}

impl<S: SpectrumSource + ?Sized> SpectrumSource for Box<S> {
    fn refresh(&mut self) {
        (**self).refresh()
    }

    fn samples(&self) -> &[f32] {
        (**self).samples()
    }
}

/// Spectrum that never changes (test fixtures, offline runs)
#[derive(Debug, Clone)]
pub struct FixedSpectrum {
    bins: Vec<f32>,
    refreshes: usize,
}

impl FixedSpectrum {
    pub fn new(bins: Vec<f32>) -> Self {
        Self { bins, refreshes: 0 }
    }

    /// Number of `refresh` calls seen so far
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// Replace the spectrum served from the next frame on
    pub fn set_bins(&mut self, bins: Vec<f32>) {
        self.bins = bins;
    }
}

impl SpectrumSource for FixedSpectrum {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn samples(&self) -> &[f32] {
        &self.bins
    }
}

/// All-zero spectrum, used when no audio device is available
#[derive(Debug, Clone)]
pub struct SilentSpectrum {
    bins: Vec<f32>,
}

impl SilentSpectrum {
    pub fn new(spectrum_size: usize) -> Self {
        Self {
            bins: vec![0.0; spectrum_size],
        }
    }
}

impl SpectrumSource for SilentSpectrum {
    fn refresh(&mut self) {}

    fn samples(&self) -> &[f32] {
        &self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_spectrum_counts_refreshes() {
        let mut source = FixedSpectrum::new(vec![0.25, 0.5]);
        assert_eq!(source.refreshes(), 0);

        source.refresh();
        source.refresh();
        assert_eq!(source.refreshes(), 2);
        assert_eq!(source.samples(), &[0.25, 0.5]);
    }

    #[test]
    fn test_snapshot_outlives_refresh() {
        let mut source = FixedSpectrum::new(vec![1.0, 2.0]);
        let snapshot = source.snapshot();

        source.set_bins(vec![3.0, 4.0]);
        source.refresh();

        assert_eq!(snapshot, vec![1.0, 2.0]);
        assert_eq!(source.samples(), &[3.0, 4.0]);
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn SpectrumSource> = Box::new(SilentSpectrum::new(8));
        source.refresh();
        assert_eq!(source.samples().len(), 8);
        assert!(source.samples().iter().all(|&s| s == 0.0));
    }
}
