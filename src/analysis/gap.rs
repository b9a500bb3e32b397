use crate::analysis::AnalysisError;
/// Replaces missing samples by linear interpolation between the nearest valid
/// neighbours, by index.
///
/// Runs of missing samples at either end have only one valid neighbour and are
/// clamped to it (the edge value is held flat).
pub fn fill_gaps(samples: &[Option<f64>]) -> Result<Vec<f64>, AnalysisError> {
    let valid: Vec<(usize, f64)> = samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.map(|v| (i, v)))
        .collect();
    let (Some(&(first_idx, first_val)), Some(&(last_idx, last_val))) = (valid.first(), valid.last())
    else {
        return Err(AnalysisError::NoSignal);
    };
    let mut filled = Vec::with_capacity(samples.len());
    let mut next = 0; // index into `valid` of the first valid sample at or after `i`
    for (i, sample) in samples.iter().enumerate() {
        if let Some(v) = sample {
            filled.push(*v);
            next += 1;
            continue;
        }
        let value = if i < first_idx {
            first_val
        } else if i > last_idx {
            last_val
        } else {
            let (lo_idx, lo_val) = valid[next - 1];
            let (hi_idx, hi_val) = valid[next];
            let frac = (i - lo_idx) as f64 / (hi_idx - lo_idx) as f64;
            lo_val + frac * (hi_val - lo_val)
        };
        filled.push(value);
    }
    Ok(filled)
}
