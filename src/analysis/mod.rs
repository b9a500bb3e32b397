// src/analysis/mod.rs
pub mod config;
pub mod error;
pub mod fft;
pub mod gap;
pub mod pipeline;
pub mod plot;
pub mod record;
pub mod report;
pub mod resample;
pub mod shape;
pub mod source;
pub use config::{AnalysisConfig, ClassifierThresholds};
pub use error::AnalysisError;
pub use fft::{SpectrumBuilder, SpectrumResult};
pub use gap::fill_gaps;
pub use pipeline::{ChannelAnalysis, ChannelReport, SignalAnalyzer};
pub use plot::{render_analysis_png, PlotStyle};
pub use record::{RawChannel, SignalLog};
pub use report::write_report;
pub use resample::{estimate_sample_rate, resample_uniform, SampleRate, UniformSeries};
pub use shape::{classify_shape, HarmonicBalance, ShapeLabel};
pub use source::{coerce_numeric, JsonLinesSource, LogRecord, ManualSource, RecordSource};
