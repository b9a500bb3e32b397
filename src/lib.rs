//! Per-channel analysis of irregularly sampled signal logs: sampling-rate
//! estimation, uniform resampling, harmonic spectrum and a coarse
//! waveform-shape label.
pub mod analysis;
pub use analysis::{
    AnalysisConfig, AnalysisError, ChannelAnalysis, ChannelReport, ShapeLabel, SignalAnalyzer,
    SignalLog,
};
