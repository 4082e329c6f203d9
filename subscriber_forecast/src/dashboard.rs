//! One full render cycle of the dashboard
//!
//! Each call loads the data, differences it, fits the model and computes the
//! diagnostics from scratch. Nothing is cached between calls.

use crate::config::DashboardConfig;
use crate::data::{DataLoader, Observation, SubscriberData};
use crate::error::Result;
use crate::forecast::{ForecastResult, Forecaster};
use crate::params::ForecastParams;
use crate::transform::DifferencedSeries;
use serde::Serialize;
use series_math::autocorrelation::{acf_correlogram, pacf_correlogram};
use series_math::Correlogram;
use std::time::Instant;
use tracing::info;

/// Everything the dashboard shows for one set of parameters
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub params: ForecastParams,
    pub observations: Vec<Observation>,
    pub differenced: DifferencedSeries,
    pub forecast: ForecastResult,
    pub acf: Correlogram,
    pub pacf: Correlogram,
    #[serde(skip)]
    data: SubscriberData,
}

impl DashboardView {
    /// Loaded data, including the raw data frame
    pub fn data(&self) -> &SubscriberData {
        &self.data
    }
}

/// Run the pipeline on already loaded data
pub fn build_view(data: SubscriberData, params: &ForecastParams, confidence: f64) -> Result<DashboardView> {
    let (order, horizon) = params.validate()?;

    let differenced = DifferencedSeries::from_observations(data.observations())?;
    let forecast = Forecaster::new(order, horizon)
        .with_integration(params.integration)
        .forecast(&differenced)?;

    let values = differenced.values();
    let acf = acf_correlogram(&values, None, confidence)?;
    let pacf = pacf_correlogram(&values, None, confidence)?;

    Ok(DashboardView {
        params: *params,
        observations: data.observations().to_vec(),
        differenced,
        forecast,
        acf,
        pacf,
        data,
    })
}

/// Load the configured data and run the pipeline
pub fn run_pipeline(config: &DashboardConfig, params: &ForecastParams) -> Result<DashboardView> {
    let started = Instant::now();
    // Reject bad parameters before touching the file
    params.validate()?;

    let data = DataLoader::from_csv(&config.data_path)?;
    let view = build_view(data, params, config.confidence)?;

    info!(
        p = params.p,
        d = params.d,
        q = params.q,
        horizon = params.horizon,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dashboard rendered"
    );
    Ok(view)
}
