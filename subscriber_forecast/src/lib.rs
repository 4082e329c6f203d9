//! # Subscriber Forecast
//!
//! A dashboard for forecasting quarterly subscriber counts with ARIMA.
//!
//! ## Features
//!
//! - Loading of `Time Period` (`DD/MM/YYYY`) / `Subscribers` CSV data
//! - First differencing with exact reconstruction from the first observation
//! - ARIMA(p, d, q) forecasts with p and q up to 5, d up to 2 and up to 10 quarters ahead
//! - ACF and PACF diagnostics of the differenced series
//! - SVG charts, HTML and text tables, CSV export
//! - An HTTP dashboard that recomputes everything per request
//!
//! ## Pipeline
//!
//! Each render runs the same steps:
//!
//! 1. [`DataLoader`] reads the observations
//! 2. [`DifferencedSeries`] takes the first difference
//! 3. [`Forecaster`] fits the model, predicts the next differences and sums
//!    them back onto the first observation
//! 4. [`presentation`] turns the result into charts and tables
//!
//! ## Quick Start
//!
//! ```no_run
//! use subscriber_forecast::data::DataLoader;
//! use subscriber_forecast::forecast::Forecaster;
//! use subscriber_forecast::params::{Horizon, ModelOrder};
//! use subscriber_forecast::transform::DifferencedSeries;
//!
//! let data = DataLoader::from_csv("data/subscriptions.csv")?;
//! let differenced = DifferencedSeries::from_observations(data.observations())?;
//!
//! let forecaster = Forecaster::new(ModelOrder::new(1, 1, 1)?, Horizon::new(5)?);
//! let result = forecaster.forecast(&differenced)?;
//!
//! for point in result.points() {
//!     println!("{}: {}", point.timestamp, point.forecast);
//! }
//! # Ok::<(), subscriber_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod forecast;
pub mod models;
pub mod params;
pub mod presentation;
pub mod server;
pub mod transform;
pub mod utils;

// Re-export commonly used types
pub use crate::config::DashboardConfig;
pub use crate::dashboard::{run_pipeline, DashboardView};
pub use crate::data::{DataLoader, Observation, SubscriberData};
pub use crate::error::ForecastError;
pub use crate::forecast::{ForecastPoint, ForecastResult, Forecaster};
pub use crate::models::{ForecastModel, ModelSummary, TrainedForecastModel};
pub use crate::params::{ForecastParams, Horizon, Integration, ModelOrder};
pub use crate::transform::DifferencedSeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
