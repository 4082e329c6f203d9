//! Differencing and integration of series
//!
//! `difference` and `integrate` are inverses of each other given the tail of
//! the series that was differenced.

/// Difference a series `order` times.
///
/// Each pass drops one leading element, so the result is `order` elements
/// shorter than the input (or empty when the input is too short).
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..order {
        if result.len() < 2 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Running total of `deltas` starting from `anchor`.
///
/// The anchor itself is not part of the output: element `i` is
/// `anchor + deltas[0] + ... + deltas[i]`.
pub fn cumulative_sum(anchor: f64, deltas: &[f64]) -> Vec<f64> {
    let mut total = anchor;
    deltas
        .iter()
        .map(|delta| {
            total += delta;
            total
        })
        .collect()
}

/// Undo `order` differences for values that continue `history`.
///
/// `forecast` is on the `order`-times differenced scale and directly follows
/// the end of `history`. The result is on the scale of `history`.
pub fn integrate(forecast: &[f64], history: &[f64], order: usize) -> Vec<f64> {
    let mut result = forecast.to_vec();
    for level in (0..order).rev() {
        let anchor = difference(history, level).last().copied().unwrap_or(0.0);
        result = cumulative_sum(anchor, &result);
    }
    result
}

/// Map a value on the `order`-times differenced scale at position `t` back to
/// the level scale using the observed values before `t`.
///
/// Uses the expansion `y[t] = w[t] + sum_{k=1..=d} (-1)^(k+1) C(d,k) y[t-k]`.
/// Returns `None` when `t < order`.
pub fn undifference_at(differenced_value: f64, history: &[f64], t: usize, order: usize) -> Option<f64> {
    if t < order || t > history.len() {
        return None;
    }

    let mut level = differenced_value;
    let mut binomial = 1.0;
    for k in 1..=order {
        binomial = binomial * (order - k + 1) as f64 / k as f64;
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        level += sign * binomial * history[t - k];
    }
    Some(level)
}
