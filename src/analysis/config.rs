use std::fs;
use std::path::Path;
use serde::Deserialize;
use crate::analysis::AnalysisError;
/// Decision thresholds used by the shape classifier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Every harmonic 2..N normalised by the fundamental must stay below this for `sine-like`.
    pub sine_ratio: f64,
    /// Odd-numbered harmonic energy must exceed `odd_even_ratio` times the even energy
    /// for the spectrum to count as odd-dominant.
    pub odd_even_ratio: f64,
    pub triangle_decay: f64,
    pub sawtooth_decay: f64,
}
impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            sine_ratio: 0.2,
            odd_even_ratio: 2.0,
            triangle_decay: -1.5,
            sawtooth_decay: -0.7,
        }
    }
}
/// Tunables for the per-channel analysis.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rate used when the timestamps cannot yield an estimate (fewer than two,
    /// or a non-positive median step).
    pub fallback_sample_rate_hz: f64,
    /// Minimum usable samples on the uniform grid.
    pub min_samples: usize,
    pub harmonic_count: usize,
    /// Harmonics at or below this magnitude are left out of the decay fit.
    pub harmonic_epsilon: f64,
    /// Added to the fundamental before normalising the upper harmonics.
    pub ratio_epsilon: f64,
    /// Slack (seconds, and grid steps) for floating-point error on the uniform grid.
    pub grid_tolerance: f64,
    /// Upper bound on the uniform grid; a channel needing more is skipped.
    pub max_grid_samples: usize,
    pub parallel: bool,
    /// Record fields read as channels, in report order.
    pub channels: Vec<String>,
    pub thresholds: ClassifierThresholds,
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fallback_sample_rate_hz: 10.0,
            min_samples: 4,
            harmonic_count: 8,
            harmonic_epsilon: 1e-12,
            ratio_epsilon: 1e-12,
            grid_tolerance: 1e-9,
            max_grid_samples: 10_000_000,
            parallel: false,
            channels: vec!["out1".into(), "out2".into(), "out3".into()],
            thresholds: ClassifierThresholds::default(),
        }
    }
}
impl AnalysisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.fallback_sample_rate_hz.is_finite() && self.fallback_sample_rate_hz > 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "fallback_sample_rate_hz must be a positive number".into(),
            ));
        }
        if self.min_samples < 2 {
            return Err(AnalysisError::InvalidConfig(
                "min_samples must be at least 2".into(),
            ));
        }
        if self.max_grid_samples < self.min_samples {
            return Err(AnalysisError::InvalidConfig(
                "max_grid_samples must be at least min_samples".into(),
            ));
        }
        if self.harmonic_count == 0 {
            return Err(AnalysisError::InvalidConfig(
                "harmonic_count must be greater than zero".into(),
            ));
        }
        if self.channels.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one channel must be configured".into(),
            ));
        }
        Ok(())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.harmonic_count, 8);
        assert_eq!(config.thresholds.sine_ratio, 0.2);
    }
    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = AnalysisConfig::from_toml_str(
            "harmonic_count = 5\nchannels = [\"a\"]\n[thresholds]\ntriangle_decay = -2.0\n",
        )
        .unwrap();
        assert_eq!(config.harmonic_count, 5);
        assert_eq!(config.channels, vec!["a".to_string()]);
        assert_eq!(config.thresholds.triangle_decay, -2.0);
        assert_eq!(config.thresholds.sawtooth_decay, -0.7);
        assert_eq!(config.fallback_sample_rate_hz, 10.0);
    }
    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            AnalysisConfig::from_toml_str("fallback_sample_rate_hz = 0.0"),
            Err(AnalysisError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("max_grid_samples = 2"),
            Err(AnalysisError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("channels = []"),
            Err(AnalysisError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("min_samples = \"four\""),
            Err(AnalysisError::Config(_))
        ));
    }
    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "parallel = true").unwrap();
        let config = AnalysisConfig::load_from(file.path()).unwrap();
        assert!(config.parallel);
    }
}
