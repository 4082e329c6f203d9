//! ARIMA(p, d, q) estimation and prediction
//!
//! The series is differenced `d` times, an ARMA(p, q) is estimated on the
//! result by minimising the conditional sum of squares (CSS), and
//! predictions are integrated back to the scale of the input series.
//!
//! An intercept is estimated by default only when `d == 0`, which matches the
//! usual trend handling of ARIMA software: a differenced model without drift.

use crate::differencing::{difference, integrate, undifference_at};
use crate::optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Largest absolute value allowed for a single AR or MA coefficient
const COEFFICIENT_BOUND: f64 = 0.99;

/// Model orders of an ARIMA process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Minimum number of observations needed to fit this order
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Unfitted ARIMA specification
#[derive(Debug, Clone)]
pub struct Arima {
    order: ArimaOrder,
    intercept: Option<bool>,
    optimizer: NelderMeadConfig,
}

impl Arima {
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            order,
            intercept: None,
            optimizer: NelderMeadConfig::default(),
        }
    }

    /// Force the intercept on or off instead of deriving it from `d`
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.intercept = Some(include);
        self
    }

    /// Override the optimiser settings
    pub fn with_optimizer(mut self, config: NelderMeadConfig) -> Self {
        self.optimizer = config;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    fn includes_intercept(&self) -> bool {
        self.intercept.unwrap_or(self.order.d == 0)
    }

    /// Fit the model to `series`.
    pub fn fit(&self, series: &[f64]) -> Result<FittedArima> {
        let ArimaOrder { p, d, q } = self.order;

        if series.len() < self.order.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "Insufficient data for {}. Need at least {} observations, got {}",
                self.order,
                self.order.min_observations(),
                series.len()
            )));
        }
        if let Some(position) = series.iter().position(|x| !x.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Series contains a non-finite value at position {}",
                position
            )));
        }

        let differenced = difference(series, d);
        let include_intercept = self.includes_intercept();
        let (center, scale) = standardization(&differenced, include_intercept);
        let scaled: Vec<f64> = differenced.iter().map(|w| (w - center) / scale).collect();

        // Parameter vector layout: [intercept?, ar_1..ar_p, ma_1..ma_q]
        let offset = usize::from(include_intercept);
        let mut initial = vec![0.0; offset + p + q];
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY); offset];
        for i in 0..p {
            initial[offset + i] = 0.1 / (i + 1) as f64;
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }
        for i in 0..q {
            initial[offset + p + i] = 0.1 / (i + 1) as f64;
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }

        let unpack = |params: &[f64]| -> (f64, Vec<f64>, Vec<f64>) {
            let intercept = if include_intercept { params[0] } else { 0.0 };
            let ar = params[offset..offset + p].to_vec();
            let ma = params[offset + p..].to_vec();
            (intercept, ar, ma)
        };

        let result = if p == 0 && q == 0 {
            // Closed form: the intercept is the mean, which is zero after centring
            let params = vec![0.0; offset];
            let value = conditional_sum_of_squares(&scaled, 0.0, &[], &[]);
            NelderMeadResult {
                optimal_point: params,
                optimal_value: value,
                iterations: 0,
                converged: true,
            }
        } else {
            nelder_mead(
                |params| {
                    let (intercept, ar, ma) = unpack(params);
                    conditional_sum_of_squares(&scaled, intercept, &ar, &ma)
                },
                &initial,
                Some(&bounds),
                self.optimizer,
            )
        };

        if !result.optimal_value.is_finite() {
            return Err(MathError::CalculationError(format!(
                "{} did not produce a finite sum of squares",
                self.order
            )));
        }
        if !result.converged {
            warn!(
                order = %self.order,
                iterations = result.iterations,
                "ARIMA optimiser stopped before reaching tolerance"
            );
        }

        let (scaled_intercept, ar_coefficients, ma_coefficients) = unpack(&result.optimal_point);
        let intercept = if include_intercept {
            center + scale * scaled_intercept
        } else {
            0.0
        };

        let (fitted, residuals) =
            one_step_predictions(&differenced, intercept, &ar_coefficients, &ma_coefficients);
        let effective = &residuals[p..];
        let n_eff = effective.len() as f64;
        let sigma2 = effective.iter().map(|r| r * r).sum::<f64>() / n_eff;

        let k = (offset + p + q + 1) as f64;
        let log_likelihood =
            -0.5 * n_eff * (1.0 + (2.0 * std::f64::consts::PI * sigma2.max(f64::MIN_POSITIVE)).ln());
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n_eff.ln();

        debug!(
            order = %self.order,
            intercept,
            sigma2,
            aic,
            iterations = result.iterations,
            "fitted ARIMA"
        );

        Ok(FittedArima {
            order: self.order,
            intercept,
            ar_coefficients,
            ma_coefficients,
            sigma2,
            log_likelihood,
            aic,
            bic,
            converged: result.converged,
            iterations: result.iterations,
            history: series.to_vec(),
            differenced,
            fitted,
            residuals,
        })
    }
}

/// A fitted ARIMA model, holding the series it was fitted on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedArima {
    order: ArimaOrder,
    intercept: f64,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    converged: bool,
    iterations: usize,
    history: Vec<f64>,
    differenced: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl FittedArima {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Mean of the differenced process (0 when no intercept was estimated)
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Residual variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Whether the optimiser reached its tolerance
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of observations the model was fitted on
    pub fn nobs(&self) -> usize {
        self.history.len()
    }

    /// Residuals on the differenced scale (zero for the first `p` positions)
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Predict positions `start..=end` on the scale of the fitted series.
    ///
    /// Positions below `nobs()` are one-step-ahead in-sample predictions,
    /// positions from `nobs()` on are dynamic out-of-sample forecasts.
    /// Positions below `d` are undefined and rejected.
    pub fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        let n = self.history.len();
        let d = self.order.d;

        if start > end {
            return Err(MathError::InvalidInput(format!(
                "Prediction start {} is after end {}",
                start, end
            )));
        }
        if start > n {
            return Err(MathError::InvalidInput(format!(
                "Prediction start {} is beyond the end of the sample ({})",
                start, n
            )));
        }
        if start < d {
            return Err(MathError::InvalidInput(format!(
                "Predictions before position {} are undefined for {} differences",
                d, d
            )));
        }

        let mut predictions = Vec::with_capacity(end - start + 1);

        for t in start..=end.min(n.saturating_sub(1)) {
            let level = undifference_at(self.fitted[t - d], &self.history, t, d).ok_or_else(|| {
                MathError::CalculationError(format!("Cannot undifference position {}", t))
            })?;
            predictions.push(level);
        }

        if end >= n {
            let forecasts = self.forecast(end - n + 1);
            let skip = start.saturating_sub(n);
            predictions.extend(forecasts.into_iter().skip(skip));
        }

        Ok(predictions)
    }

    /// Forecast the next `steps` values after the end of the sample
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }

        let p = self.order.p;
        let q = self.order.q;
        let mut extended = self.differenced.clone();
        let mut errors = self.residuals.clone();

        for _ in 0..steps {
            let t = extended.len();
            let mut prediction = self.intercept;
            for i in 0..p {
                if t > i {
                    prediction += self.ar_coefficients[i] * (extended[t - 1 - i] - self.intercept);
                }
            }
            for j in 0..q {
                if t > j {
                    prediction += self.ma_coefficients[j] * errors[t - 1 - j];
                }
            }
            extended.push(prediction);
            errors.push(0.0);
        }

        let differenced_forecast = &extended[self.differenced.len()..];
        integrate(differenced_forecast, &self.history, self.order.d)
    }
}

/// Centre and scale used to condition the optimisation
fn standardization(values: &[f64], include_intercept: bool) -> (f64, f64) {
    let n = values.len().max(1) as f64;
    let mean = values.iter().sum::<f64>() / n;
    let center = if include_intercept { mean } else { 0.0 };
    let spread = (values.iter().map(|v| (v - center).powi(2)).sum::<f64>() / n).sqrt();
    let scale = if spread > 0.0 && spread.is_finite() { spread } else { 1.0 };
    (center, scale)
}

/// Sum of squared one-step errors, conditioning on the first `p` values
fn conditional_sum_of_squares(series: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> f64 {
    let (_, residuals) = one_step_predictions(series, intercept, ar, ma);
    residuals[ar.len().min(residuals.len())..]
        .iter()
        .map(|e| e * e)
        .sum()
}

/// One-step-ahead predictions and residuals of an ARMA recursion.
///
/// Positions before `p` are predicted by the intercept and carry a zero
/// residual.
fn one_step_predictions(series: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = series.len();
    let p = ar.len();
    let mut fitted = vec![intercept; n];
    let mut residuals = vec![0.0; n];

    for t in p..n {
        let mut prediction = intercept;
        for (i, phi) in ar.iter().enumerate() {
            prediction += phi * (series[t - 1 - i] - intercept);
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                prediction += theta * residuals[t - 1 - j];
            }
        }
        fitted[t] = prediction;
        residuals[t] = series[t] - prediction;
    }

    (fitted, residuals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[test]
    fn test_order_display() {
        let order = ArimaOrder::new(2, 1, 3);
        assert_eq!(order.to_string(), "ARIMA(2,1,3)");
        assert_eq!(order.min_observations(), 7);
    }

    #[test]
    fn test_white_noise_mean() {
        let data = vec![10.0, 10.0, 10.0, 10.0, 10.0];
        let fitted = Arima::new(ArimaOrder::new(0, 0, 0)).fit(&data).unwrap();
        assert_abs_diff_eq!(fitted.intercept(), 10.0, epsilon = 1e-12);
        assert_eq!(fitted.forecast(3), vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_ar1_recovery() {
        let e = noise(400, 7);
        let mut data = vec![0.0];
        for t in 1..400 {
            data.push(0.6 * data[t - 1] + e[t]);
        }

        let fitted = Arima::new(ArimaOrder::new(1, 0, 0)).fit(&data).unwrap();
        assert_abs_diff_eq!(fitted.ar_coefficients()[0], 0.6, epsilon = 0.1);
        assert!(fitted.sigma2() > 0.7 && fitted.sigma2() < 1.3);
    }

    #[test]
    fn test_ma1_fit() {
        let e = noise(400, 11);
        let mut data = vec![e[0]];
        for t in 1..400 {
            data.push(e[t] + 0.5 * e[t - 1]);
        }

        let fitted = Arima::new(ArimaOrder::new(0, 0, 1)).fit(&data).unwrap();
        assert_abs_diff_eq!(fitted.ma_coefficients()[0], 0.5, epsilon = 0.15);
    }

    #[test]
    fn test_random_walk_without_drift() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 + 3.0 * i as f64).collect();
        let fitted = Arima::new(ArimaOrder::new(0, 1, 0)).fit(&data).unwrap();
        assert_eq!(fitted.intercept(), 0.0);
        // Without drift a random walk forecast stays at the last value
        assert_eq!(fitted.forecast(2), vec![187.0, 187.0]);
    }

    #[test]
    fn test_forced_intercept_with_differencing() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 + 3.0 * i as f64).collect();
        let fitted = Arima::new(ArimaOrder::new(0, 1, 0))
            .with_intercept(true)
            .fit(&data)
            .unwrap();
        let forecast = fitted.forecast(2);
        assert_abs_diff_eq!(forecast[0], 190.0, epsilon = 1e-9);
        assert_abs_diff_eq!(forecast[1], 193.0, epsilon = 1e-9);
    }

    #[test]
    fn test_predict_ranges() {
        let e = noise(60, 3);
        let data: Vec<f64> = e
            .iter()
            .scan(50.0, |level, x| {
                *level += 0.2 + x;
                Some(*level)
            })
            .collect();
        let fitted = Arima::new(ArimaOrder::new(1, 1, 1)).fit(&data).unwrap();

        let out_of_sample = fitted.predict(60, 64).unwrap();
        assert_eq!(out_of_sample, fitted.forecast(5));

        let in_sample = fitted.predict(1, 59).unwrap();
        assert_eq!(in_sample.len(), 59);
        assert!(in_sample.iter().all(|v| v.is_finite()));

        let straddling = fitted.predict(58, 61).unwrap();
        assert_eq!(straddling.len(), 4);
        assert_eq!(&straddling[2..], &out_of_sample[..2]);

        assert!(fitted.predict(0, 3).is_err());
        assert!(fitted.predict(5, 4).is_err());
        assert!(fitted.predict(61, 62).is_err());
    }

    #[test]
    fn test_insufficient_data() {
        let result = Arima::new(ArimaOrder::new(2, 1, 2)).fit(&[1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_non_finite_input() {
        let result = Arima::new(ArimaOrder::new(0, 0, 0)).fit(&[1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn test_information_criteria_are_finite() {
        let e = noise(80, 5);
        let fitted = Arima::new(ArimaOrder::new(2, 0, 1)).fit(&e).unwrap();
        assert!(fitted.aic().is_finite());
        assert!(fitted.bic() > fitted.aic());
        assert_eq!(fitted.residuals().len(), 80);
    }
}
