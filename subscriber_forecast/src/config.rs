//! Dashboard configuration

use crate::error::Result;
use crate::params::ForecastParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default location of the subscriber data
pub const DEFAULT_DATA_PATH: &str = "data/subscriptions.csv";

/// Settings shared by every render of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file with `Time Period` and `Subscribers` columns
    pub data_path: PathBuf,
    /// Page heading
    pub title: String,
    /// Line shown under the heading
    pub description: String,
    /// Title of the history/forecast chart
    pub chart_title: String,
    /// Text of the "Data Source" sidebar section
    pub data_source: String,
    /// Text of the "About" sidebar section
    pub about: String,
    /// Confidence level of the ACF/PACF bands
    pub confidence: f64,
    /// Address the HTTP server binds to
    pub host: String,
    pub port: u16,
    /// Parameters used when a request does not set them
    pub defaults: ForecastParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            title: "Subscription Forecasting".to_string(),
            description: "This app forecasts the number of subscriptions for the next quarters using ARIMA."
                .to_string(),
            chart_title: "Quarterly Subscription Forecast".to_string(),
            data_source: "The data used in this app is from a fictional dataset of subscription growth."
                .to_string(),
            about: "This app is created to demonstrate time series forecasting with ARIMA.".to_string(),
            confidence: 0.95,
            host: "127.0.0.1".to_string(),
            port: 8080,
            defaults: ForecastParams::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON configuration file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// `host:port` for binding the server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
