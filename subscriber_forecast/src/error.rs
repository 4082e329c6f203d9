//! Error types for the subscriber_forecast crate

use plotters::drawing::DrawingAreaErrorKind;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the subscriber_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A value in the input could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error while writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error while encoding JSON output
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A chart could not be drawn
    #[error("Render error: {0}")]
    RenderError(String),

    /// Error from the numerical routines
    #[error("Math error: {0}")]
    MathError(#[from] series_math::MathError),
}

impl ForecastError {
    /// Whether the error was caused by the caller's input rather than the
    /// data or the model
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::ValidationError(_) | ForecastError::InvalidParameter(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for ForecastError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ForecastError::RenderError(err.to_string())
    }
}

impl From<chrono::ParseError> for ForecastError {
    fn from(err: chrono::ParseError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for ForecastError {
    fn from(err: std::num::ParseIntError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}
