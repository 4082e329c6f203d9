//! First differencing of the subscriber series

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Change in subscribers between two consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferencedPoint {
    /// Date of the later observation of the pair
    pub timestamp: NaiveDate,
    pub delta: i64,
}

/// First difference of a series, keeping the first observation so the
/// levels can be rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferencedSeries {
    anchor: Observation,
    points: Vec<DifferencedPoint>,
}

impl DifferencedSeries {
    /// Difference `observations` once, dropping the undefined leading value
    pub fn from_observations(observations: &[Observation]) -> Result<Self> {
        let anchor = match observations {
            [first, _, ..] => *first,
            _ => {
                return Err(ForecastError::DataError(format!(
                    "Differencing needs at least 2 observations, got {}",
                    observations.len()
                )))
            }
        };

        let points = observations
            .windows(2)
            .map(|pair| {
                let delta = pair[1]
                    .subscribers
                    .checked_sub(pair[0].subscribers)
                    .ok_or_else(|| {
                        ForecastError::DataError(format!(
                            "Subscriber change from {} to {} is out of range",
                            pair[0].timestamp, pair[1].timestamp
                        ))
                    })?;
                Ok(DifferencedPoint {
                    timestamp: pair[1].timestamp,
                    delta,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { anchor, points })
    }

    /// First observation of the original series
    pub fn anchor(&self) -> Observation {
        self.anchor
    }

    pub fn points(&self) -> &[DifferencedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Deltas as floats, for model fitting
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.delta as f64).collect()
    }

    /// Date of the last point
    pub fn last_timestamp(&self) -> NaiveDate {
        self.points
            .last()
            .map(|p| p.timestamp)
            .unwrap_or(self.anchor.timestamp)
    }

    /// Rebuild the original observations by summing the deltas onto the anchor
    pub fn reconstruct(&self) -> Result<Vec<Observation>> {
        let mut level = self.anchor.subscribers;
        let mut observations = Vec::with_capacity(self.points.len() + 1);
        observations.push(self.anchor);
        for point in &self.points {
            level = level.checked_add(point.delta).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Subscriber level at {} is out of range",
                    point.timestamp
                ))
            })?;
            observations.push(Observation::new(point.timestamp, level));
        }
        Ok(observations)
    }
}
