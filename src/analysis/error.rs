use thiserror::Error;
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no signal: every sample in the channel is missing")]
    NoSignal,
    #[error("insufficient samples: {usable} usable, {required} required")]
    InsufficientSamples { usable: usize, required: usize },
    #[error("uniform grid would need {requested} samples, limit is {limit}")]
    GridTooLarge { requested: f64, limit: usize },
    #[error("log contains no usable timestamps")]
    EmptyLog,
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("length mismatch: {timestamps} timestamps, {samples} samples")]
    LengthMismatch { timestamps: usize, samples: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AnalysisError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for AnalysisError {
    fn from(value: image::ImageError) -> Self {
        AnalysisError::Plot(value.to_string())
    }
}
