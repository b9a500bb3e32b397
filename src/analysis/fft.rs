use ndarray::Array1;
use rustfft::{num_complex::Complex64, FftPlanner};
use crate::analysis::UniformSeries;
/// One-sided magnitude spectrum of a single channel plus its harmonic profile.
#[derive(Clone, Debug)]
pub struct SpectrumResult {
    pub sample_rate_hz: f64,
    pub frequencies_hz: Vec<f64>,
    pub magnitudes: Vec<f64>, // DC bin zeroed
    pub dominant_bin: usize,
    pub dominant_hz: f64,
    /// `harmonics[k - 1]` is the magnitude nearest to `k * dominant_hz`.
    pub harmonics: Vec<f64>,
}
impl SpectrumResult {
    pub fn bin_width_hz(&self) -> f64 {
        match self.frequencies_hz.get(1) {
            Some(f) => *f,
            None => self.sample_rate_hz,
        }
    }
}
/// Helper that computes spectra and harmonic profiles.
pub struct SpectrumBuilder {
    harmonic_count: usize,
}
impl SpectrumBuilder {
    pub fn with_harmonics(harmonic_count: usize) -> Self {
        Self { harmonic_count }
    }
    /// `series` should already be detrended; any residual DC is discarded.
    pub fn compute(&self, series: &UniformSeries) -> SpectrumResult {
        let (frequencies_hz, mut magnitudes) =
            real_magnitude_spectrum(&series.values, series.sample_rate_hz);
        if let Some(dc) = magnitudes.first_mut() {
            *dc = 0.0;
        }
        let dominant_bin = argmax(&magnitudes);
        let dominant_hz = frequencies_hz.get(dominant_bin).copied().unwrap_or(0.0);
        let harmonics = if dominant_hz > 0.0 {
            (1..=self.harmonic_count)
                .map(|k| magnitudes[nearest_bin(&frequencies_hz, k as f64 * dominant_hz)])
                .collect()
        } else {
            vec![0.0; self.harmonic_count]
        };
        SpectrumResult {
            sample_rate_hz: series.sample_rate_hz,
            frequencies_hz,
            magnitudes,
            dominant_bin,
            dominant_hz,
            harmonics,
        }
    }
}
/// Unnormalised `|X_k|` for the `N / 2 + 1` non-negative frequency bins of a real signal.
pub fn real_magnitude_spectrum(values: &[f64], sample_rate_hz: f64) -> (Vec<f64>, Vec<f64>) {
    let n = values.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let bins = n / 2 + 1;
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex64> = values.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    fft.process(&mut buffer);
    let frequencies = (0..bins)
        .map(|k| k as f64 * sample_rate_hz / n as f64)
        .collect();
    let magnitudes = buffer.iter().take(bins).map(|c| c.norm()).collect();
    (frequencies, magnitudes)
}
/// Index of the bin closest to `target_hz`; ties go to the lower index.
pub fn nearest_bin(frequencies_hz: &[f64], target_hz: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, f) in frequencies_hz.iter().enumerate() {
        let distance = (f - target_hz).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmplitudeMetrics {
    pub peak_to_peak: f64,
    pub rms: f64,
}
pub fn amplitude_metrics(values: &[f64]) -> AmplitudeMetrics {
    if values.is_empty() {
        return AmplitudeMetrics {
            peak_to_peak: 0.0,
            rms: 0.0,
        };
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean_square = values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64;
    AmplitudeMetrics {
        peak_to_peak: max - min,
        rms: mean_square.sqrt(),
    }
}
/// Slope of the least-squares line through `(ln k, ln harmonic_k)`.
///
/// Only harmonics above `epsilon` take part; with fewer than three of them
/// the exponent is 0.
pub fn fit_decay_exponent(harmonics: &[f64], epsilon: f64) -> f64 {
    let (log_index, log_magnitude): (Vec<f64>, Vec<f64>) = harmonics
        .iter()
        .enumerate()
        .filter(|(_, magnitude)| **magnitude > epsilon)
        .map(|(i, &magnitude)| (((i + 1) as f64).ln(), magnitude.ln()))
        .unzip();
    if log_index.len() < 3 {
        return 0.0;
    }
    let x = Array1::from(log_index);
    let y = Array1::from(log_magnitude);
    let dx = &x - x.mean().unwrap_or(0.0);
    let dy = &y - y.mean().unwrap_or(0.0);
    let sxx = dx.dot(&dx);
    if sxx == 0.0 {
        return 0.0;
    }
    dx.dot(&dy) / sxx
}
