//! ARIMA models for subscriber forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ModelSummary, TrainedForecastModel};
use crate::params::ModelOrder;
use series_math::{Arima, FittedArima, MathError};
use tracing::debug;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ModelOrder,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    fitted: FittedArima,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ModelOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
        }
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }
}

/// Fitting failures are reported as forecasting errors
fn fitting_error(name: &str, err: MathError) -> ForecastError {
    ForecastError::ForecastingError(format!("{} could not be fitted: {}", name, err))
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, series: &[f64]) -> Result<TrainedArimaModel> {
        debug!(model = %self.name, observations = series.len(), "training model");
        let fitted = Arima::new(self.order.to_arima_order())
            .fit(series)
            .map_err(|e| fitting_error(&self.name, e))?;

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Underlying fitted model
    pub fn fitted(&self) -> &FittedArima {
        &self.fitted
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let forecasts = self.fitted.forecast(horizon);
        if forecasts.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ForecastingError(format!(
                "{} produced a non-finite forecast",
                self.name
            )));
        }
        Ok(forecasts)
    }

    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        let predictions = self
            .fitted
            .predict(start, end)
            .map_err(|e| ForecastError::ForecastingError(format!("{}: {}", self.name, e)))?;
        if predictions.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ForecastingError(format!(
                "{} produced a non-finite prediction",
                self.name
            )));
        }
        Ok(predictions)
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.name.clone(),
            intercept: self.fitted.intercept(),
            ar_coefficients: self.fitted.ar_coefficients().to_vec(),
            ma_coefficients: self.fitted.ma_coefficients().to_vec(),
            sigma2: self.fitted.sigma2(),
            log_likelihood: self.fitted.log_likelihood(),
            aic: self.fitted.aic(),
            bic: self.fitted.bic(),
            converged: self.fitted.converged(),
            iterations: self.fitted.iterations(),
            nobs: self.fitted.nobs(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
