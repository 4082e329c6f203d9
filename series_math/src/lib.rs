//! # Series Math
//!
//! Numerical building blocks for univariate time series forecasting.
//! This crate has no notion of dates or files; it works on plain `f64` slices.
//!
//! - Differencing and its inverse (cumulative summation from an anchor)
//! - Sample autocorrelation and partial autocorrelation with confidence bands
//! - ARIMA(p, d, q) estimation by conditional sum of squares
//!
//! ## Example
//!
//! ```
//! use series_math::{cumulative_sum, difference};
//!
//! let levels = vec![100.0, 110.0, 125.0, 130.0];
//! let deltas = difference(&levels, 1);
//! assert_eq!(deltas, vec![10.0, 15.0, 5.0]);
//!
//! let mut rebuilt = vec![levels[0]];
//! rebuilt.extend(cumulative_sum(levels[0], &deltas));
//! assert_eq!(rebuilt, levels);
//! ```

use thiserror::Error;

pub mod arima;
pub mod autocorrelation;
pub mod differencing;
pub mod optimization;

pub use arima::{Arima, ArimaOrder, FittedArima};
pub use autocorrelation::{acf, pacf, Correlogram};
pub use differencing::{cumulative_sum, difference, integrate};

/// Errors that can occur in time series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Round to the nearest integer, ties to even.
///
/// Non-finite input saturates (`NaN` becomes 0).
pub fn round_to_integer(value: f64) -> i64 {
    value.round_ties_even() as i64
}
