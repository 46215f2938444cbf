//! Derived-metric calculators: pure functions over ordered value sequences.

/// Trailing year-over-year ratio growth.
///
/// The output has the same length as the input. The first `lag` entries are
/// `None` (insufficient history); from there on,
/// `out[i] = y[i] / y[i - lag] - 1` when both points are present and the
/// denominator is non-zero, otherwise `None`. A zero or missing historical
/// point yields `None`, never an error or an infinity, so one bad observation
/// cannot poison the whole derived series.
pub fn yoy(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for i in lag..values.len() {
        out[i] = match (values[i], values[i - lag]) {
            (Some(num), Some(den)) if den != 0.0 => Some(num / den - 1.0),
            _ => None,
        };
    }
    out
}

/// Elementwise unit rescaling; gaps pass through unchanged.
pub fn rescale(values: &[Option<f64>], factor: f64) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(|v| v * factor)).collect()
}
