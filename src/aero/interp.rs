// ---------------------------------------------------------------------------
// Piecewise-linear lookup helpers shared by the polar and thrust tables
// ---------------------------------------------------------------------------

/// Indices of the stored keys bracketing `x` in an ascending slice.
///
/// `lower` is the largest key <= x (or the first key when none qualifies),
/// `upper` the smallest key >= x (or the last key). Both are equal when `x`
/// hits a key exactly or lies outside the stored range.
pub fn bracket(keys: &[f64], x: f64) -> Option<(usize, usize)> {
    if keys.is_empty() {
        return None;
    }
    let last = keys.len() - 1;
    let above = keys.partition_point(|&k| k <= x);
    let lower = above.saturating_sub(1);
    let upper = keys.partition_point(|&k| k < x).min(last);
    Some((lower, upper))
}

/// Linear interpolation of `ys` over ascending `xs`, extrapolating with the
/// slope of the nearest end segment outside the sampled range.
///
/// A single sample acts as a constant. Empty input yields NaN; the tables
/// reject empty blocks at construction.
pub fn linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    match xs.len() {
        0 => f64::NAN,
        1 => ys[0],
        n => {
            let i = xs.partition_point(|&k| k < x).clamp(1, n - 1);
            let (x0, x1) = (xs[i - 1], xs[i]);
            let (y0, y1) = (ys[i - 1], ys[i]);
            y0 + (x - x0) * (y1 - y0) / (x1 - x0)
        }
    }
}

/// Blend two values by the position of `x` between `x0` and `x1`.
pub fn blend(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    let ratio = (x - x0) / (x1 - x0);
    y0 + ratio * (y1 - y0)
}
