use log::warn;
use crate::analysis::AnalysisError;
/// Sampling rate of a log, either estimated from its timestamps or defaulted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleRate {
    Estimated(f64),
    /// The timebase was degenerate (fewer than two timestamps, or a
    /// non-positive median step) and the configured default was used.
    Fallback(f64),
}
impl SampleRate {
    pub fn hz(&self) -> f64 {
        match *self {
            SampleRate::Estimated(hz) | SampleRate::Fallback(hz) => hz,
        }
    }
    pub fn is_fallback(&self) -> bool {
        matches!(self, SampleRate::Fallback(_))
    }
}
/// Estimates the rate as `1000 / median(successive differences)` of millisecond timestamps.
pub fn estimate_sample_rate(timestamps_ms: &[f64], fallback_hz: f64) -> SampleRate {
    if timestamps_ms.len() < 2 {
        warn!(
            "{} timestamp(s) cannot give a rate; using {fallback_hz} Hz",
            timestamps_ms.len()
        );
        return SampleRate::Fallback(fallback_hz);
    }
    let mut diffs: Vec<f64> = timestamps_ms.windows(2).map(|w| w[1] - w[0]).collect();
    diffs.sort_by(f64::total_cmp);
    let mid = diffs.len() / 2;
    let median = if diffs.len() % 2 == 0 {
        (diffs[mid - 1] + diffs[mid]) / 2.0
    } else {
        diffs[mid]
    };
    if median.is_finite() && median > 0.0 {
        SampleRate::Estimated(1000.0 / median)
    } else {
        warn!("median timestamp step is {median} ms; using {fallback_hz} Hz");
        SampleRate::Fallback(fallback_hz)
    }
}
/// Signal on a constant-interval grid starting at t = 0 s.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformSeries {
    pub sample_rate_hz: f64,
    pub times_s: Vec<f64>,
    pub values: Vec<f64>, // NaN where the grid falls outside the recorded span
}
impl UniformSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn spacing_s(&self) -> f64 {
        1.0 / self.sample_rate_hz
    }
    /// Keeps only the run of defined samples, dropping undefined grid points at either end.
    pub fn defined(self) -> UniformSeries {
        let start = self.values.iter().position(|v| v.is_finite());
        let end = self.values.iter().rposition(|v| v.is_finite());
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end + 1),
            _ => (0, 0),
        };
        UniformSeries {
            sample_rate_hz: self.sample_rate_hz,
            times_s: self.times_s[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
    /// Same grid with the arithmetic mean subtracted.
    pub fn detrended(&self) -> UniformSeries {
        let mean = if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        };
        UniformSeries {
            sample_rate_hz: self.sample_rate_hz,
            times_s: self.times_s.clone(),
            values: self.values.iter().map(|v| v - mean).collect(),
        }
    }
}
/// Linearly interpolates `values` (sampled at `timestamps_ms`) onto a uniform
/// grid at `sample_rate_hz`. Extra entries in the longer of the two slices are
/// ignored.
///
/// The grid holds `floor(span * fs) + 1` points; `tolerance` absorbs
/// floating-point error both in that count and at the ends of the span. A grid
/// larger than `max_samples` fails with `GridTooLarge` before allocating.
///
/// Timestamps are expected to be non-decreasing. Out-of-order input is not
/// rejected, only logged: each grid point is then bracketed by a binary search
/// over unsorted data, so the interpolated values are unreliable.
pub fn resample_uniform(
    timestamps_ms: &[f64],
    values: &[f64],
    sample_rate_hz: f64,
    tolerance: f64,
    max_samples: usize,
) -> Result<UniformSeries, AnalysisError> {
    let len = timestamps_ms.len().min(values.len());
    let (timestamps_ms, values) = (&timestamps_ms[..len], &values[..len]);
    let Some(&origin) = timestamps_ms.first() else {
        return Ok(UniformSeries {
            sample_rate_hz,
            times_s: Vec::new(),
            values: Vec::new(),
        });
    };
    if let Some(i) = timestamps_ms.windows(2).position(|w| w[1] < w[0]) {
        warn!(
            "timestamps go backwards at row {} ({} ms after {} ms); resampled values are unreliable",
            i + 1,
            timestamps_ms[i + 1],
            timestamps_ms[i]
        );
    }
    let times: Vec<f64> = timestamps_ms.iter().map(|t| (t - origin) / 1000.0).collect();
    let span = times[times.len() - 1];
    let requested = if span >= 0.0 {
        (span * sample_rate_hz + tolerance).floor() + 1.0
    } else {
        0.0
    };
    if requested.is_nan() || requested > max_samples as f64 {
        return Err(AnalysisError::GridTooLarge {
            requested,
            limit: max_samples,
        });
    }
    let count = requested as usize;
    let times_s: Vec<f64> = (0..count).map(|i| i as f64 / sample_rate_hz).collect();
    let resampled = times_s
        .iter()
        .map(|&t| interpolate(&times, values, t, tolerance))
        .collect();
    Ok(UniformSeries {
        sample_rate_hz,
        times_s,
        values: resampled,
    })
}
fn interpolate(times: &[f64], values: &[f64], x: f64, tolerance: f64) -> f64 {
    let first = times[0];
    let last = times[times.len() - 1];
    if x < first - tolerance || x > last + tolerance {
        return f64::NAN;
    }
    let x = x.max(first).min(last);
    // first sample strictly after x; repeated timestamps resolve to the later sample
    let hi = times.partition_point(|&t| t <= x);
    if hi == 0 {
        return values[0];
    }
    if hi == times.len() {
        return values[times.len() - 1];
    }
    let lo = hi - 1;
    let frac = (x - times[lo]) / (times[hi] - times[lo]);
    values[lo] + frac * (values[hi] - values[lo])
}
