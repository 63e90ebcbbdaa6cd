//! Ramp-rate limiting of generation profiles.

/// Limits the step-to-step change of `series` to at most `rate`.
///
/// Step 0 passes through unchanged; every later value is clamped into
/// `[out[i-1] - rate, out[i-1] + rate]` against the already-limited
/// previous value.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::ramp::apply_ramp;
///
/// let ramped = apply_ramp(&[0.0, 10.0, 10.0, 0.0], 4.0);
/// assert_eq!(ramped, vec![0.0, 4.0, 8.0, 4.0]);
/// ```
pub fn apply_ramp(series: &[f32], rate: f32) -> Vec<f32> {
    // NaN and negative rates collapse to 0 so clamp bounds stay ordered
    let rate = rate.max(0.0);
    let mut out = Vec::with_capacity(series.len());
    let mut iter = series.iter().copied();
    let Some(first) = iter.next() else {
        return out;
    };
    out.push(first);
    let mut prev = first;
    for value in iter {
        let next = value.clamp(prev - rate, prev + rate);
        out.push(next);
        prev = next;
    }
    out
}
