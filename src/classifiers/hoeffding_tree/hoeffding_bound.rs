/// Additive error bound on the mean of `n` observations in `[0, range]`,
/// holding with probability `1 - confidence`.
///
/// Callers must not evaluate it for `n == 0`.
#[inline]
pub fn compute_hoeffding_bound(range: f64, confidence: f64, n: f64) -> f64 {
    debug_assert!(n > 0.0, "hoeffding bound needs at least one observation");
    ((range * range * (1.0 / confidence).ln()) / (2.0 * n)).sqrt()
}
