use std::collections::VecDeque;
use std::io::BufRead;
use log::debug;
use serde_json::Value;
use crate::analysis::AnalysisError;
/// One ingested line: a timestamp in milliseconds and one value per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub timestamp_ms: f64,
    pub values: Vec<Option<f64>>,
}
impl LogRecord {
    pub fn new(timestamp_ms: f64, values: Vec<Option<f64>>) -> Self {
        Self {
            timestamp_ms,
            values,
        }
    }
}
/// Trait representing something that can yield log records on demand.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<LogRecord>, AnalysisError>;
}
/// Numbers pass through, numeric strings are parsed, everything else is missing.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
/// Reads one JSON object per line, e.g.
/// `{"timestamp": 1700000000123, "out1": "0.52", "out2": "--", "out3": 1.5}`.
///
/// Blank lines, lines that are not JSON objects and lines without a numeric
/// `timestamp` are skipped.
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    fields: Vec<String>,
    line: Vec<u8>,
    line_number: usize,
    skipped: usize,
}
impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, fields: Vec<String>) -> Self {
        Self {
            reader,
            fields,
            line: Vec::new(),
            line_number: 0,
            skipped: 0,
        }
    }
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }
    fn parse_line(&self, line: &str) -> Option<LogRecord> {
        let object = match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => map,
            _ => return None,
        };
        let timestamp_ms = object.get("timestamp").and_then(coerce_numeric)?;
        let values = self
            .fields
            .iter()
            .map(|field| object.get(field).and_then(coerce_numeric))
            .collect();
        Some(LogRecord::new(timestamp_ms, values))
    }
}
impl<R: BufRead> RecordSource for JsonLinesSource<R> {
    fn next_record(&mut self) -> Result<Option<LogRecord>, AnalysisError> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let Ok(text) = std::str::from_utf8(&self.line) else {
                self.skipped += 1;
                debug!("skipping line {} with invalid UTF-8", self.line_number);
                continue;
            };
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.parse_line(trimmed) {
                Some(record) => return Ok(Some(record)),
                None => {
                    self.skipped += 1;
                    debug!("skipping malformed line {}", self.line_number);
                }
            }
        }
    }
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<LogRecord>,
}
impl ManualSource {
    pub fn new(records: impl IntoIterator<Item = LogRecord>) -> Self {
        Self {
            queue: records.into_iter().collect(),
        }
    }
}
impl RecordSource for ManualSource {
    fn next_record(&mut self) -> Result<Option<LogRecord>, AnalysisError> {
        Ok(self.queue.pop_front())
    }
}
