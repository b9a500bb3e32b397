use std::io::{self, Write};
use crate::analysis::{AnalysisError, ChannelReport};
/// Writes the per-channel text summary, one block per channel in order.
pub fn write_report<W: Write>(out: &mut W, reports: &[ChannelReport]) -> io::Result<()> {
    for report in reports {
        writeln!(out, "--- {} ---", report.label)?;
        let analysis = match &report.outcome {
            Ok(analysis) => analysis,
            Err(AnalysisError::NoSignal) => {
                writeln!(out, "no signal")?;
                continue;
            }
            Err(AnalysisError::InsufficientSamples { usable, required }) => {
                writeln!(
                    out,
                    "insufficient samples ({usable} usable, {required} required)"
                )?;
                continue;
            }
            Err(other) => {
                writeln!(out, "skipped: {other}")?;
                continue;
            }
        };
        let fallback = if analysis.sample_rate.is_fallback() {
            " (fallback)"
        } else {
            ""
        };
        writeln!(
            out,
            "Estimated sampling rate: {:.3} Hz{fallback}",
            analysis.sample_rate.hz()
        )?;
        writeln!(out, "Dominant frequency: {:.6} Hz", analysis.dominant_hz)?;
        writeln!(out, "Peak-to-peak amplitude: {:.6}", analysis.peak_to_peak)?;
        writeln!(out, "RMS: {:.6}", analysis.rms)?;
        writeln!(
            out,
            "Shape: {} (decay_exp {:.3})",
            analysis.shape, analysis.decay_exponent
        )?;
        let harmonics: Vec<String> = analysis
            .harmonics
            .iter()
            .map(|h| format!("{h:.6}"))
            .collect();
        writeln!(
            out,
            "Harmonics (first {}): [{}]",
            analysis.harmonics.len(),
            harmonics.join(", ")
        )?;
    }
    Ok(())
}
