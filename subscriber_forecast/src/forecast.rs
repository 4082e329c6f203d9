//! Subscriber level forecasts
//!
//! The default pipeline fits the model on the first difference of the
//! subscriber series, predicts the next differences, appends them to the
//! observed differences and sums everything onto the first observation. The
//! last `horizon` sums are the forecast levels.

use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaModel;
use crate::models::{ForecastModel, ModelSummary, TrainedForecastModel};
use crate::params::{Horizon, Integration, ModelOrder};
use crate::transform::DifferencedSeries;
use crate::utils::future_timestamps;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::{cumulative_sum, round_to_integer};
use tracing::info;

/// Spacing of the subscriber series, in months
pub const MONTHS_PER_QUARTER: u32 = 3;

/// One forecast quarter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDate,
    /// Unrounded forecast
    pub value: f64,
    /// Forecast rounded to whole subscribers
    pub forecast: i64,
}

/// Forecast result containing predicted subscriber levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    horizon: usize,
    integration: Integration,
    model: ModelSummary,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(
        points: Vec<ForecastPoint>,
        horizon: Horizon,
        integration: Integration,
        model: ModelSummary,
    ) -> Result<Self> {
        if points.len() != horizon.get() {
            return Err(ForecastError::ValidationError(format!(
                "Points length ({}) doesn't match horizon ({})",
                points.len(),
                horizon.get()
            )));
        }

        Ok(Self {
            points,
            horizon: horizon.get(),
            integration,
            model,
        })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn integration(&self) -> Integration {
        self.integration
    }

    /// Summary of the model that produced the forecast
    pub fn model(&self) -> &ModelSummary {
        &self.model
    }

    /// Unrounded forecast values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Rounded forecast values
    pub fn forecasts(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.forecast).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.timestamp).collect()
    }
}

/// Runs one forecast for a fixed order and horizon
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    order: ModelOrder,
    horizon: Horizon,
    integration: Integration,
}

impl Forecaster {
    pub fn new(order: ModelOrder, horizon: Horizon) -> Self {
        Self {
            order,
            horizon,
            integration: Integration::default(),
        }
    }

    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.integration = integration;
        self
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Forecast the subscriber levels following `series`
    pub fn forecast(&self, series: &DifferencedSeries) -> Result<ForecastResult> {
        let steps = self.horizon.get();
        let model = ArimaModel::new(self.order);

        let (values, summary) = match self.integration {
            Integration::PreDifferenced => {
                let deltas = series.values();
                let trained = model.train(&deltas)?;
                let n = deltas.len();
                let predicted = trained.predict(n, n + steps - 1)?;

                let mut combined = deltas;
                combined.extend_from_slice(&predicted);
                let levels = cumulative_sum(series.anchor().subscribers as f64, &combined);
                (levels[levels.len() - steps..].to_vec(), trained.summary())
            }
            Integration::ModelOnly => {
                let levels: Vec<f64> = series
                    .reconstruct()?
                    .iter()
                    .map(|o| o.subscribers as f64)
                    .collect();
                let trained = model.train(&levels)?;
                (trained.forecast(steps)?, trained.summary())
            }
        };

        let timestamps = future_timestamps(series.last_timestamp(), steps, MONTHS_PER_QUARTER)?;
        let points: Vec<ForecastPoint> = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| ForecastPoint {
                timestamp,
                value,
                forecast: round_to_integer(value),
            })
            .collect();

        info!(
            model = %summary.name,
            integration = %self.integration,
            horizon = steps,
            first = points.first().map(|p| p.forecast),
            "forecast complete"
        );

        ForecastResult::new(points, self.horizon, self.integration, summary)
    }
}
