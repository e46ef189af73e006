use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Spectral reduction of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSummary {
    /// Magnitude-weighted frequency centroid in Hz. 0 for an all-zero window.
    pub average_frequency_hz: f32,
    /// Mean bin magnitude over the first N/2 bins.
    pub average_amplitude: f32,
}

/// Computes a forward FFT per window and reduces it to a [`SpectralSummary`].
///
/// The transform plan is built once and reused; the per-window complex buffer
/// is scoped to each `analyze` call so nothing outlives a window on any path.
pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window_len: usize,
    freq_resolution_hz: f32,
}

impl SpectralAnalyzer {
    pub fn new(window_len: usize, sample_rate: u32) -> Self {
        debug_assert!(window_len > 0, "window_len must be non-zero");
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(window_len);
        Self {
            fft,
            window_len,
            freq_resolution_hz: sample_rate as f32 / window_len as f32,
        }
    }

    /// Pure per-window reduction: deterministic, no error path.
    pub fn analyze(&self, window: &[f32]) -> SpectralSummary {
        debug_assert_eq!(window.len(), self.window_len);

        let mut buffer: Vec<Complex<f32>> = window
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        // Real input: the upper half mirrors the lower, use bins [0, N/2)
        let half = self.window_len / 2;
        let mut sum_magnitude = 0.0f32;
        let mut weighted_bins = 0.0f32;
        for (i, c) in buffer[..half].iter().enumerate() {
            let magnitude = c.norm();
            sum_magnitude += magnitude;
            weighted_bins += i as f32 * magnitude;
        }

        let centroid_bin = if sum_magnitude > 0.0 {
            weighted_bins / sum_magnitude
        } else {
            0.0
        };
        let average_amplitude = if half > 0 {
            sum_magnitude / half as f32
        } else {
            0.0
        };

        SpectralSummary {
            average_frequency_hz: centroid_bin * self.freq_resolution_hz,
            average_amplitude,
        }
    }
}
