use crate::analysis::source::{LogRecord, RecordSource};
use crate::analysis::AnalysisError;
/// One channel as ingested: `None` marks a missing sample.
#[derive(Clone, Debug, PartialEq)]
pub struct RawChannel {
    pub label: String,
    pub samples: Vec<Option<f64>>,
}
impl RawChannel {
    pub fn new(label: impl Into<String>, samples: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            samples,
        }
    }
    pub fn missing_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_none()).count()
    }
}
/// Fully materialised log: timestamps (ms) shared by every channel.
#[derive(Clone, Debug)]
pub struct SignalLog {
    timestamps_ms: Vec<f64>,
    channels: Vec<RawChannel>,
}
impl SignalLog {
    pub fn with_channels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            timestamps_ms: Vec::new(),
            channels: labels
                .into_iter()
                .map(|label| RawChannel::new(label, Vec::new()))
                .collect(),
        }
    }
    /// Drains `source` into a new log with the given channel labels.
    pub fn collect<S, L>(source: &mut S, labels: impl IntoIterator<Item = L>) -> Result<Self, AnalysisError>
    where
        S: RecordSource,
        L: Into<String>,
    {
        let mut log = Self::with_channels(labels);
        while let Some(record) = source.next_record()? {
            log.push_record(record)?;
        }
        Ok(log)
    }
    pub fn push_record(&mut self, record: LogRecord) -> Result<(), AnalysisError> {
        if record.values.len() != self.channels.len() {
            return Err(AnalysisError::ChannelMismatch {
                expected: self.channels.len(),
                actual: record.values.len(),
            });
        }
        self.timestamps_ms.push(record.timestamp_ms);
        for (channel, value) in self.channels.iter_mut().zip(record.values) {
            channel.samples.push(value);
        }
        Ok(())
    }
    pub fn timestamps_ms(&self) -> &[f64] {
        &self.timestamps_ms
    }
    pub fn channels(&self) -> &[RawChannel] {
        &self.channels
    }
    pub fn len(&self) -> usize {
        self.timestamps_ms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        match (self.timestamps_ms.first(), self.timestamps_ms.last()) {
            (Some(first), Some(last)) => (last - first) / 1000.0,
            _ => 0.0,
        }
    }
}
