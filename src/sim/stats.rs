//! Order statistics over demand series.

/// Percentile of `values` with linear interpolation between closest ranks.
///
/// `pct` is in `[0, 100]`; the rank is `pct / 100 * (n - 1)`. Returns `None`
/// for an empty slice.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::stats::percentile;
///
/// assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 50.0), Some(3.0));
/// assert_eq!(percentile(&[], 80.0), None);
/// ```
pub fn percentile(values: &[f32], pct: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let rank = f64::from(pct.clamp(0.0, 100.0)) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    let (a, b) = (f64::from(sorted[lo]), f64::from(sorted[hi]));
    Some((a + (b - a) * frac) as f32)
}
