use std::panic;
use std::thread;
use log::{info, warn};
use crate::analysis::fft::{amplitude_metrics, fit_decay_exponent, SpectrumBuilder, SpectrumResult};
use crate::analysis::gap::fill_gaps;
use crate::analysis::resample::{estimate_sample_rate, resample_uniform, SampleRate, UniformSeries};
use crate::analysis::shape::{classify_shape, HarmonicBalance, ShapeLabel};
use crate::analysis::{AnalysisConfig, AnalysisError, RawChannel, SignalLog};
/// Everything measured for one channel.
#[derive(Clone, Debug)]
pub struct ChannelAnalysis {
    pub sample_rate: SampleRate,
    pub dominant_hz: f64,
    pub peak_to_peak: f64,
    pub rms: f64,
    pub harmonics: Vec<f64>,
    pub balance: HarmonicBalance,
    pub decay_exponent: f64,
    pub shape: ShapeLabel,
    /// Detrended uniform series the metrics were taken from.
    pub series: UniformSeries,
    pub spectrum: SpectrumResult,
}
/// Outcome for one channel; a failed channel does not affect the others.
#[derive(Debug)]
pub struct ChannelReport {
    pub label: String,
    pub outcome: Result<ChannelAnalysis, AnalysisError>,
}
impl ChannelReport {
    pub fn analysis(&self) -> Option<&ChannelAnalysis> {
        self.outcome.as_ref().ok()
    }
    pub fn shape(&self) -> ShapeLabel {
        match &self.outcome {
            Ok(analysis) => analysis.shape,
            Err(_) => ShapeLabel::NoSignal,
        }
    }
}
/// Runs gap filling, resampling, spectral estimation and shape classification per channel.
pub struct SignalAnalyzer {
    config: AnalysisConfig,
}
impl SignalAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
    /// Analyses every channel of `log`. Fails only when the log has no timestamps.
    pub fn analyze_log(&self, log: &SignalLog) -> Result<Vec<ChannelReport>, AnalysisError> {
        if log.is_empty() {
            return Err(AnalysisError::EmptyLog);
        }
        let timestamps = log.timestamps_ms();
        let reports: Vec<ChannelReport> = if self.config.parallel {
            thread::scope(|scope| {
                let handles: Vec<_> = log
                    .channels()
                    .iter()
                    .map(|channel| scope.spawn(move || self.report_channel(timestamps, channel)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
                    .collect()
            })
        } else {
            log.channels()
                .iter()
                .map(|channel| self.report_channel(timestamps, channel))
                .collect()
        };
        Ok(reports)
    }
    pub fn analyze_channel(
        &self,
        timestamps_ms: &[f64],
        samples: &[Option<f64>],
    ) -> Result<ChannelAnalysis, AnalysisError> {
        if timestamps_ms.len() != samples.len() {
            return Err(AnalysisError::LengthMismatch {
                timestamps: timestamps_ms.len(),
                samples: samples.len(),
            });
        }
        let config = &self.config;
        let filled = fill_gaps(samples)?;
        let sample_rate = estimate_sample_rate(timestamps_ms, config.fallback_sample_rate_hz);
        let uniform = resample_uniform(
            timestamps_ms,
            &filled,
            sample_rate.hz(),
            config.grid_tolerance,
            config.max_grid_samples,
        )?
        .defined();
        if uniform.len() < config.min_samples {
            return Err(AnalysisError::InsufficientSamples {
                usable: uniform.len(),
                required: config.min_samples,
            });
        }
        let series = uniform.detrended();
        let spectrum = SpectrumBuilder::with_harmonics(config.harmonic_count).compute(&series);
        let metrics = amplitude_metrics(&series.values);
        let decay_exponent = fit_decay_exponent(&spectrum.harmonics, config.harmonic_epsilon);
        let shape = classify_shape(
            &spectrum.harmonics,
            decay_exponent,
            &config.thresholds,
            config.ratio_epsilon,
        );
        Ok(ChannelAnalysis {
            sample_rate,
            dominant_hz: spectrum.dominant_hz,
            peak_to_peak: metrics.peak_to_peak,
            rms: metrics.rms,
            harmonics: spectrum.harmonics.clone(),
            balance: HarmonicBalance::of(&spectrum.harmonics),
            decay_exponent,
            shape,
            series,
            spectrum,
        })
    }
    fn report_channel(&self, timestamps_ms: &[f64], channel: &RawChannel) -> ChannelReport {
        let outcome = self.analyze_channel(timestamps_ms, &channel.samples);
        match &outcome {
            Ok(analysis) => info!(
                "{}: {} at {:.3} Hz ({} samples, {} missing filled)",
                channel.label,
                analysis.shape,
                analysis.dominant_hz,
                analysis.series.len(),
                channel.missing_count()
            ),
            Err(err) => warn!("{}: skipped, {err}", channel.label),
        }
        ChannelReport {
            label: channel.label.clone(),
            outcome,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::source::{LogRecord, ManualSource};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::PI;
    const RATE_HZ: f64 = 50.0;
    const SAMPLES: usize = 250;
    fn sine_at(t: f64) -> f64 {
        (2.0 * PI * 2.0 * t).sin()
    }
    fn square_at(t: f64) -> f64 {
        if (2.0 * t).fract() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }
    /// Three channels at 50 Hz for 5 s: all missing, 2 Hz sine, 2 Hz square.
    fn three_channel_log() -> SignalLog {
        let records = (0..SAMPLES).map(|i| {
            let t = i as f64 / RATE_HZ;
            LogRecord::new(
                i as f64 * 1000.0 / RATE_HZ,
                vec![None, Some(sine_at(t)), Some(square_at(t))],
            )
        });
        let mut source = ManualSource::new(records);
        SignalLog::collect(&mut source, ["out1", "out2", "out3"]).unwrap()
    }
    fn check_three_channels(reports: &[ChannelReport]) {
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].label, "out1");
        assert!(matches!(reports[0].outcome, Err(AnalysisError::NoSignal)));
        assert_eq!(reports[0].shape(), ShapeLabel::NoSignal);
        let sine = reports[1].analysis().unwrap();
        assert_eq!(sine.shape, ShapeLabel::SineLike);
        assert!((sine.sample_rate.hz() - RATE_HZ).abs() < 1e-9);
        assert!((sine.dominant_hz - 2.0).abs() <= sine.spectrum.bin_width_hz());
        assert!((sine.rms - 0.5f64.sqrt()).abs() < 1e-3);
        assert!((sine.peak_to_peak - 2.0).abs() < 0.01);
        let square = reports[2].analysis().unwrap();
        assert!(matches!(
            square.shape,
            ShapeLabel::SquareLike | ShapeLabel::TriangleLike
        ));
        assert!(square.balance.odd > 2.0 * square.balance.even);
        assert!((square.dominant_hz - 2.0).abs() <= square.spectrum.bin_width_hz());
    }
    #[test]
    fn end_to_end_three_channels() {
        let analyzer = SignalAnalyzer::new(AnalysisConfig::default());
        let reports = analyzer.analyze_log(&three_channel_log()).unwrap();
        check_three_channels(&reports);
    }
    #[test]
    fn parallel_matches_sequential_order() {
        let config = AnalysisConfig {
            parallel: true,
            ..AnalysisConfig::default()
        };
        let reports = SignalAnalyzer::new(config)
            .analyze_log(&three_channel_log())
            .unwrap();
        check_three_channels(&reports);
    }
    #[test]
    fn empty_log_is_fatal() {
        let log = SignalLog::with_channels(["out1"]);
        let analyzer = SignalAnalyzer::new(AnalysisConfig::default());
        assert!(matches!(analyzer.analyze_log(&log), Err(AnalysisError::EmptyLog)));
    }
    #[test]
    fn too_few_samples_are_skipped() {
        let analyzer = SignalAnalyzer::new(AnalysisConfig::default());
        let err = analyzer
            .analyze_channel(&[0.0, 100.0, 200.0], &[Some(0.0), Some(1.0), Some(0.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientSamples {
                usable: 3,
                required: 4
            }
        ));
        let err = analyzer.analyze_channel(&[0.0], &[Some(1.0)]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSamples { usable: 1, .. }));
    }
    #[test]
    fn outlier_timestamp_skips_only_its_log() {
        let mut timestamps: Vec<f64> = (0..50).map(|i| i as f64 * 20.0).collect();
        timestamps.push(1e17);
        let mut source = ManualSource::new(
            timestamps
                .iter()
                .map(|&t| LogRecord::new(t, vec![Some(sine_at(t / 1000.0)), None])),
        );
        let log = SignalLog::collect(&mut source, ["out1", "out2"]).unwrap();
        let analyzer = SignalAnalyzer::new(AnalysisConfig::default());
        let reports = analyzer.analyze_log(&log).unwrap();
        assert!(matches!(
            reports[0].outcome,
            Err(AnalysisError::GridTooLarge { .. })
        ));
        assert!(matches!(reports[1].outcome, Err(AnalysisError::NoSignal)));
        assert_eq!(
            analyzer.config().max_grid_samples,
            AnalysisConfig::default().max_grid_samples
        );
    }
    #[test]
    fn mismatched_lengths_are_rejected() {
        let analyzer = SignalAnalyzer::new(AnalysisConfig::default());
        let err = analyzer.analyze_channel(&[0.0, 1.0], &[Some(1.0)]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::LengthMismatch {
                timestamps: 2,
                samples: 1
            }
        ));
    }
    #[test]
    fn constant_channel_is_flat() {
        let timestamps: Vec<f64> = (0..40).map(|i| i as f64 * 100.0).collect();
        let samples = vec![Some(5.0); 40];
        let analysis = SignalAnalyzer::new(AnalysisConfig::default())
            .analyze_channel(&timestamps, &samples)
            .unwrap();
        assert_eq!(analysis.shape, ShapeLabel::Flat);
        assert_eq!(analysis.dominant_hz, 0.0);
        assert_eq!(analysis.peak_to_peak, 0.0);
        assert_eq!(analysis.rms, 0.0);
        assert_eq!(analysis.decay_exponent, 0.0);
    }
    #[test]
    fn offset_does_not_change_amplitude_metrics() {
        let timestamps: Vec<f64> = (0..SAMPLES).map(|i| i as f64 * 20.0).collect();
        let clean: Vec<Option<f64>> = (0..SAMPLES)
            .map(|i| Some(sine_at(i as f64 / RATE_HZ)))
            .collect();
        let shifted: Vec<Option<f64>> = clean.iter().map(|v| v.map(|x| x + 7.5)).collect();
        let analyzer = SignalAnalyzer::new(AnalysisConfig::default());
        let a = analyzer.analyze_channel(&timestamps, &clean).unwrap();
        let b = analyzer.analyze_channel(&timestamps, &shifted).unwrap();
        assert!((a.rms - b.rms).abs() < 1e-9);
        assert!((a.peak_to_peak - b.peak_to_peak).abs() < 1e-9);
        assert!(b.series.values.iter().sum::<f64>().abs() < 1e-6);
    }
    #[test]
    fn gaps_and_jittered_timestamps_still_find_the_tone() {
        let mut rng = StdRng::seed_from_u64(17);
        let timestamps: Vec<f64> = (0..SAMPLES)
            .map(|i| i as f64 * 20.0 + rng.gen_range(-3.0..3.0))
            .collect();
        let samples: Vec<Option<f64>> = timestamps
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i % 17 == 5 {
                    None
                } else {
                    Some(sine_at((t - timestamps[0]) / 1000.0))
                }
            })
            .collect();
        let analysis = SignalAnalyzer::new(AnalysisConfig::default())
            .analyze_channel(&timestamps, &samples)
            .unwrap();
        assert!(!analysis.sample_rate.is_fallback());
        assert!((analysis.sample_rate.hz() - RATE_HZ).abs() < 2.0);
        assert!((analysis.dominant_hz - 2.0).abs() <= analysis.spectrum.bin_width_hz());
        assert_eq!(analysis.shape, ShapeLabel::SineLike);
    }
    #[test]
    fn repeated_timestamps_fall_back_to_default_rate() {
        let timestamps = [0.0, 0.0, 0.0, 1000.0, 1000.0];
        let samples = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let analysis = SignalAnalyzer::new(AnalysisConfig::default())
            .analyze_channel(&timestamps, &samples)
            .unwrap();
        assert_eq!(analysis.sample_rate, SampleRate::Fallback(10.0));
        assert_eq!(analysis.series.len(), 11);
    }
}
