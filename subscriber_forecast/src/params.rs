//! Forecast parameters chosen on the dashboard
//!
//! Every value is bounded; the constructors reject anything outside the
//! ranges the dashboard selectors offer.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use series_math::ArimaOrder;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Allowed AR orders
pub const AR_ORDER_RANGE: RangeInclusive<usize> = 0..=5;
/// Allowed differencing orders
pub const DIFFERENCE_ORDER_RANGE: RangeInclusive<usize> = 0..=2;
/// Allowed MA orders
pub const MA_ORDER_RANGE: RangeInclusive<usize> = 0..=5;
/// Allowed forecast horizons, in quarters
pub const HORIZON_RANGE: RangeInclusive<usize> = 1..=10;

fn check(name: &str, value: usize, range: &RangeInclusive<usize>) -> Result<usize> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ForecastError::ValidationError(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Validated ARIMA order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOrder {
    p: usize,
    d: usize,
    q: usize,
}

impl ModelOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        Ok(Self {
            p: check("p (AR order)", p, &AR_ORDER_RANGE)?,
            d: check("d (difference order)", d, &DIFFERENCE_ORDER_RANGE)?,
            q: check("q (MA order)", q, &MA_ORDER_RANGE)?,
        })
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn to_arima_order(&self) -> ArimaOrder {
        ArimaOrder::new(self.p, self.d, self.q)
    }
}

impl Default for ModelOrder {
    fn default() -> Self {
        Self { p: 1, d: 1, q: 1 }
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_arima_order(), f)
    }
}

/// Number of future quarters to forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon(usize);

impl Horizon {
    pub fn new(steps: usize) -> Result<Self> {
        Ok(Self(check("Forecast horizon", steps, &HORIZON_RANGE)?))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(5)
    }
}

/// How forecasts are mapped back to subscriber levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Integration {
    /// Fit on the first difference, then sum the history and the predicted
    /// differences from the first observation
    #[default]
    PreDifferenced,
    /// Fit on the subscriber levels and let the model undo its own differencing
    ModelOnly,
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integration::PreDifferenced => write!(f, "pre-differenced"),
            Integration::ModelOnly => write!(f, "model-only"),
        }
    }
}

impl FromStr for Integration {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pre-differenced" | "pre_differenced" | "differenced" => Ok(Integration::PreDifferenced),
            "model-only" | "model_only" | "levels" => Ok(Integration::ModelOnly),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown integration mode '{}' (expected pre-differenced or model-only)",
                other
            ))),
        }
    }
}

/// Unvalidated parameters as they arrive from a query string or the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastParams {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub horizon: usize,
    pub integration: Integration,
}

impl Default for ForecastParams {
    fn default() -> Self {
        let order = ModelOrder::default();
        Self {
            p: order.p,
            d: order.d,
            q: order.q,
            horizon: Horizon::default().get(),
            integration: Integration::default(),
        }
    }
}

impl ForecastParams {
    /// Check every value against its range
    pub fn validate(&self) -> Result<(ModelOrder, Horizon)> {
        Ok((
            ModelOrder::new(self.p, self.d, self.q)?,
            Horizon::new(self.horizon)?,
        ))
    }

    /// Query string reproducing these parameters
    pub fn to_query(&self) -> String {
        format!(
            "p={}&d={}&q={}&horizon={}&integration={}",
            self.p, self.d, self.q, self.horizon, self.integration
        )
    }
}

/// Query string parameters; anything left out falls back to configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ForecastQuery {
    pub p: Option<usize>,
    pub d: Option<usize>,
    pub q: Option<usize>,
    pub horizon: Option<usize>,
    pub integration: Option<Integration>,
}

impl ForecastQuery {
    pub fn resolve(&self, defaults: &ForecastParams) -> ForecastParams {
        ForecastParams {
            p: self.p.unwrap_or(defaults.p),
            d: self.d.unwrap_or(defaults.d),
            q: self.q.unwrap_or(defaults.q),
            horizon: self.horizon.unwrap_or(defaults.horizon),
            integration: self.integration.unwrap_or(defaults.integration),
        }
    }
}
