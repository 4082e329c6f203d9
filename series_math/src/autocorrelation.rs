//! Sample autocorrelation diagnostics
//!
//! Estimators follow the usual correlogram conventions:
//! - ACF from the biased (divide by `n`) sample autocovariance
//! - PACF from the Durbin–Levinson recursion on the sample ACF (Yule–Walker)
//! - ACF confidence bands from Bartlett's formula, PACF bands from `1/sqrt(n)`

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Coefficients for lags `0..=max_lag` with a confidence half-width per lag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlogram {
    /// Coefficient per lag, starting at lag 0
    pub values: Vec<f64>,
    /// Half-width of the confidence band around zero, per lag
    pub bands: Vec<f64>,
    /// Number of observations the estimates were computed from
    pub nobs: usize,
    /// Confidence level of the bands (e.g. 0.95)
    pub confidence: f64,
}

impl Correlogram {
    /// Largest lag in the correlogram
    pub fn max_lag(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// Whether the coefficient at `lag` falls outside its confidence band.
    /// Lag 0 is never reported as significant.
    pub fn is_significant(&self, lag: usize) -> bool {
        if lag == 0 {
            return false;
        }
        match (self.values.get(lag), self.bands.get(lag)) {
            (Some(value), Some(band)) => value.abs() > *band,
            _ => false,
        }
    }

    /// Lags whose coefficient is outside the confidence band
    pub fn significant_lags(&self) -> Vec<usize> {
        (1..self.values.len())
            .filter(|&lag| self.is_significant(lag))
            .collect()
    }
}

/// Default number of ACF lags for a series of length `n`: `min(10*log10(n), n-1)`
pub fn default_acf_lags(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let by_length = (10.0 * (n as f64).log10()).floor() as usize;
    by_length.min(n - 1)
}

/// Default number of PACF lags for a series of length `n`: `min(10*log10(n), n/2-1)`
pub fn default_pacf_lags(n: usize) -> usize {
    if n < 4 {
        return 0;
    }
    let by_length = (10.0 * (n as f64).log10()).floor() as usize;
    by_length.min(n / 2 - 1)
}

/// Biased sample autocovariance for lags `0..=max_lag`
pub fn autocovariance(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let n = data.len();
    if n == 0 {
        return Err(MathError::InsufficientData(
            "Autocovariance needs at least one observation".to_string(),
        ));
    }
    if max_lag >= n {
        return Err(MathError::InvalidInput(format!(
            "Lag {} requires more than {} observations",
            max_lag, n
        )));
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    Ok((0..=max_lag)
        .map(|lag| {
            data[lag..]
                .iter()
                .zip(&data[..n - lag])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum::<f64>()
                / n as f64
        })
        .collect())
}

/// Sample autocorrelation for lags `0..=max_lag`.
///
/// A series with zero variance has no measurable serial correlation: every
/// lag after 0 is reported as 0.
pub fn acf(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let gamma = autocovariance(data, max_lag)?;
    let variance = gamma[0];
    if variance <= f64::EPSILON * data.iter().map(|x| x * x).sum::<f64>().max(1.0) {
        let mut flat = vec![0.0; max_lag + 1];
        flat[0] = 1.0;
        return Ok(flat);
    }
    Ok(gamma.iter().map(|g| g / variance).collect())
}

/// Partial autocorrelation for lags `0..=max_lag` via Durbin–Levinson
pub fn pacf(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let rho = acf(data, max_lag)?;
    let mut result = vec![0.0; max_lag + 1];
    result[0] = 1.0;
    if max_lag == 0 {
        return Ok(result);
    }

    let mut phi = vec![0.0; max_lag + 1];
    phi[1] = rho[1];
    result[1] = rho[1];

    for k in 2..=max_lag {
        let numerator = rho[k] - (1..k).map(|j| phi[j] * rho[k - j]).sum::<f64>();
        let denominator = 1.0 - (1..k).map(|j| phi[j] * rho[j]).sum::<f64>();
        if denominator.abs() < 1e-12 {
            return Err(MathError::CalculationError(format!(
                "Durbin-Levinson recursion is singular at lag {}",
                k
            )));
        }

        let phi_kk = numerator / denominator;
        let previous = phi.clone();
        for j in 1..k {
            phi[j] = previous[j] - phi_kk * previous[k - j];
        }
        phi[k] = phi_kk;
        result[k] = phi_kk;
    }

    Ok(result)
}

/// Two-sided standard normal quantile for a confidence level, e.g. 1.96 for 0.95
pub fn normal_quantile(confidence: f64) -> Result<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Confidence level must be between 0 and 1, got {}",
            confidence
        )));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| MathError::CalculationError(format!("Standard normal: {}", e)))?;
    Ok(normal.inverse_cdf(0.5 + confidence / 2.0))
}

/// ACF with Bartlett confidence bands.
///
/// `max_lag` defaults to [`default_acf_lags`].
pub fn acf_correlogram(data: &[f64], max_lag: Option<usize>, confidence: f64) -> Result<Correlogram> {
    let n = data.len();
    if n < 2 {
        return Err(MathError::InsufficientData(
            "ACF needs at least two observations".to_string(),
        ));
    }
    let max_lag = max_lag.unwrap_or_else(|| default_acf_lags(n));
    let values = acf(data, max_lag)?;
    let z = normal_quantile(confidence)?;

    let mut bands = Vec::with_capacity(values.len());
    let mut cumulative = 0.0;
    for lag in 0..values.len() {
        if lag == 0 {
            bands.push(0.0);
            continue;
        }
        if lag > 1 {
            cumulative += values[lag - 1].powi(2);
        }
        let variance = (1.0 + 2.0 * cumulative) / n as f64;
        bands.push(z * variance.sqrt());
    }

    Ok(Correlogram {
        values,
        bands,
        nobs: n,
        confidence,
    })
}

/// PACF with `1/sqrt(n)` confidence bands.
///
/// `max_lag` defaults to [`default_pacf_lags`] and may not exceed `n/2 - 1`.
pub fn pacf_correlogram(data: &[f64], max_lag: Option<usize>, confidence: f64) -> Result<Correlogram> {
    let n = data.len();
    if n < 2 {
        return Err(MathError::InsufficientData(
            "PACF needs at least two observations".to_string(),
        ));
    }
    let limit = (n / 2).saturating_sub(1);
    let max_lag = max_lag.unwrap_or_else(|| default_pacf_lags(n));
    if max_lag > limit {
        return Err(MathError::InvalidInput(format!(
            "PACF lags must be at most {} for {} observations, got {}",
            limit, n, max_lag
        )));
    }

    let values = pacf(data, max_lag)?;
    let z = normal_quantile(confidence)?;
    let band = z / (n as f64).sqrt();
    let bands = (0..values.len())
        .map(|lag| if lag == 0 { 0.0 } else { band })
        .collect();

    Ok(Correlogram {
        values,
        bands,
        nobs: n,
        confidence,
    })
}
