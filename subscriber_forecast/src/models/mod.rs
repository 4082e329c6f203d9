//! Forecasting models for the subscriber series

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Fitted parameters and fit statistics of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Name of the model, e.g. `ARIMA(1,1,1)`
    pub name: String,
    pub intercept: f64,
    pub ar_coefficients: Vec<f64>,
    pub ma_coefficients: Vec<f64>,
    /// Residual variance
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Whether the optimiser reached its tolerance
    pub converged: bool,
    pub iterations: usize,
    /// Number of observations the model was trained on
    pub nobs: usize,
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast the next `horizon` values after the training series
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Predict positions `start..=end` of the training series' index.
    ///
    /// Positions inside the training series are one-step-ahead fitted
    /// values, positions after it are forecasts.
    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>>;

    /// Fitted parameters
    fn summary(&self) -> ModelSummary;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a series
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
