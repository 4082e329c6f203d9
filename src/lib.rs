//! # Subscriber Dash
//!
//! Workspace facade for the subscriber forecasting dashboard.
//!
//! - [`series_math`]: differencing, correlograms and ARIMA estimation on plain `f64` series
//! - [`subscriber_forecast`]: data loading, the forecasting pipeline, rendering and the HTTP server
//!
//! ## Example
//!
//! ```
//! use subscriber_dash_workspace::forecast::{Horizon, ModelOrder};
//!
//! let order = ModelOrder::new(1, 1, 1).unwrap();
//! assert_eq!(order.to_string(), "ARIMA(1,1,1)");
//! assert!(Horizon::new(11).is_err());
//! ```

pub use series_math as math;
pub use subscriber_forecast as forecast;
