//! Technical indicators over closing-price series
//!
//! Inputs must already be sorted by trade date in ascending order.

/// Calculate a trailing Simple Moving Average for a given window
///
/// # Arguments
/// * `closes` - Closing prices sorted by trade date
/// * `window` - Number of observations per average (e.g., 5, 10, 20)
///
/// # Returns
/// * Vector of the same length as `closes`. The first `window - 1` entries are
///   `None` because there is not enough history. A window of 0 or one longer
///   than the series yields all `None`.
pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut ma_values = vec![None; closes.len()];

    if window == 0 || closes.len() < window {
        return ma_values;
    }

    for i in (window - 1)..closes.len() {
        let start_idx = i + 1 - window;
        let sum: f64 = closes[start_idx..=i].iter().sum();
        ma_values[i] = Some(sum / window as f64);
    }

    ma_values
}
