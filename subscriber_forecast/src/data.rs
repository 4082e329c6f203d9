//! Subscriber data loading
//!
//! The input is a CSV file with a `Time Period` column holding dates as
//! `DD/MM/YYYY` and a `Subscribers` column holding integer counts, one row
//! per quarter.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Name of the date column
pub const TIME_COLUMN: &str = "Time Period";
/// Name of the subscriber count column
pub const SUBSCRIBERS_COLUMN: &str = "Subscribers";
/// Date format of the time column
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One row of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Start of the quarter
    pub timestamp: NaiveDate,
    /// Subscriber count at that date
    pub subscribers: i64,
}

impl Observation {
    pub fn new(timestamp: NaiveDate, subscribers: i64) -> Self {
        Self {
            timestamp,
            subscribers,
        }
    }
}

/// Subscriber time series, in file order
#[derive(Debug, Clone)]
pub struct SubscriberData {
    /// Data frame as read, used for the raw data table
    df: DataFrame,
    /// Parsed rows
    observations: Vec<Observation>,
}

/// Data loader for subscriber data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load subscriber data from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SubscriberData> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading subscriber data");
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let data = Self::from_dataframe(df)?;
        info!(
            path = %path.display(),
            rows = data.len(),
            "loaded subscriber data"
        );
        Ok(data)
    }

    /// Create subscriber data from an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<SubscriberData> {
        if df.height() == 0 {
            return Err(ForecastError::DataError(
                "Subscriber data contains no rows".to_string(),
            ));
        }

        let timestamps = Self::parse_time_column(&df)?;
        let subscribers = Self::parse_subscribers_column(&df)?;

        let observations: Vec<Observation> = timestamps
            .into_iter()
            .zip(subscribers)
            .map(|(timestamp, subscribers)| Observation::new(timestamp, subscribers))
            .collect();

        let data = SubscriberData { df, observations };
        if !data.is_chronological() {
            warn!("subscriber data is not in chronological order; keeping file order");
        }
        Ok(data)
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        df.column(name).map_err(|_| {
            ForecastError::DataError(format!(
                "Missing column '{}' (found: {})",
                name,
                df.get_column_names().join(", ")
            ))
        })
    }

    fn parse_time_column(df: &DataFrame) -> Result<Vec<NaiveDate>> {
        let column = Self::column(df, TIME_COLUMN)?;
        let text = column.cast(&DataType::Utf8)?;

        text.utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or_else(|| {
                    ForecastError::DataError(format!("Missing {} in row {}", TIME_COLUMN, row + 1))
                })?;
                NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
                    ForecastError::ParseError(format!(
                        "Invalid date '{}' in row {} (expected DD/MM/YYYY): {}",
                        value,
                        row + 1,
                        e
                    ))
                })
            })
            .collect()
    }

    fn parse_subscribers_column(df: &DataFrame) -> Result<Vec<i64>> {
        let column = Self::column(df, SUBSCRIBERS_COLUMN)?;

        match column.dtype() {
            DataType::Int64 | DataType::Int32 | DataType::UInt32 | DataType::UInt64 => {
                let counts = column.cast(&DataType::Int64)?;
                counts
                    .i64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, value)| {
                        value.ok_or_else(|| {
                            ForecastError::DataError(format!(
                                "Missing {} in row {}",
                                SUBSCRIBERS_COLUMN,
                                row + 1
                            ))
                        })
                    })
                    .collect()
            }
            DataType::Float64 | DataType::Float32 => {
                let counts = column.cast(&DataType::Float64)?;
                counts
                    .f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, value)| match value {
                        Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
                        Some(v) => Err(ForecastError::ParseError(format!(
                            "{} in row {} is not an integer: {}",
                            SUBSCRIBERS_COLUMN,
                            row + 1,
                            v
                        ))),
                        None => Err(ForecastError::DataError(format!(
                            "Missing {} in row {}",
                            SUBSCRIBERS_COLUMN,
                            row + 1
                        ))),
                    })
                    .collect()
            }
            DataType::Utf8 => column
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let value = value.ok_or_else(|| {
                        ForecastError::DataError(format!(
                            "Missing {} in row {}",
                            SUBSCRIBERS_COLUMN,
                            row + 1
                        ))
                    })?;
                    value.trim().parse::<i64>().map_err(|e| {
                        ForecastError::ParseError(format!(
                            "{} in row {} is not an integer '{}': {}",
                            SUBSCRIBERS_COLUMN,
                            row + 1,
                            value,
                            e
                        ))
                    })
                })
                .collect(),
            other => Err(ForecastError::DataError(format!(
                "Unsupported type {} for column '{}'",
                other, SUBSCRIBERS_COLUMN
            ))),
        }
    }
}

impl SubscriberData {
    /// Build subscriber data from in-memory observations
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::DataError(
                "Subscriber data contains no rows".to_string(),
            ));
        }

        let dates: Vec<String> = observations
            .iter()
            .map(|o| o.timestamp.format(DATE_FORMAT).to_string())
            .collect();
        let counts: Vec<i64> = observations.iter().map(|o| o.subscribers).collect();
        let df = DataFrame::new(vec![
            Series::new(TIME_COLUMN, dates),
            Series::new(SUBSCRIBERS_COLUMN, counts),
        ])?;

        Ok(Self { df, observations })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Dates of all observations
    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    /// Subscriber counts as floats
    pub fn subscribers(&self) -> Vec<f64> {
        self.observations
            .iter()
            .map(|o| o.subscribers as f64)
            .collect()
    }

    /// Date of the last observation
    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.timestamp)
    }

    /// Whether dates are strictly increasing
    pub fn is_chronological(&self) -> bool {
        self.observations
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_dataframe_parses_columns() {
        let df = DataFrame::new(vec![
            Series::new(TIME_COLUMN, &["01/04/2013", "01/07/2013", "01/10/2013"]),
            Series::new(SUBSCRIBERS_COLUMN, &[34_240_000i64, 35_640_000, 38_010_000]),
        ])
        .unwrap();

        let data = DataLoader::from_dataframe(df).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(
            data.observations()[1],
            Observation::new(date(2013, 7, 1), 35_640_000)
        );
        assert_eq!(data.last_timestamp(), Some(date(2013, 10, 1)));
        assert!(data.is_chronological());
    }

    #[test]
    fn test_missing_column() {
        let df = DataFrame::new(vec![Series::new(TIME_COLUMN, &["01/04/2013"])]).unwrap();
        let err = DataLoader::from_dataframe(df).unwrap_err();
        assert!(matches!(err, ForecastError::DataError(_)));
        assert!(err.to_string().contains(SUBSCRIBERS_COLUMN));
    }

    #[test]
    fn test_bad_date_format() {
        let df = DataFrame::new(vec![
            Series::new(TIME_COLUMN, &["2013-04-01"]),
            Series::new(SUBSCRIBERS_COLUMN, &[1i64]),
        ])
        .unwrap();
        let err = DataLoader::from_dataframe(df).unwrap_err();
        assert!(matches!(err, ForecastError::ParseError(_)));
    }

    #[test]
    fn test_fractional_counts_are_rejected() {
        let df = DataFrame::new(vec![
            Series::new(TIME_COLUMN, &["01/04/2013", "01/07/2013"]),
            Series::new(SUBSCRIBERS_COLUMN, &[10.0f64, 10.5]),
        ])
        .unwrap();
        assert!(matches!(
            DataLoader::from_dataframe(df),
            Err(ForecastError::ParseError(_))
        ));
    }

    #[test]
    fn test_unordered_data_is_kept_as_read() {
        let data = SubscriberData::from_observations(vec![
            Observation::new(date(2013, 7, 1), 2),
            Observation::new(date(2013, 4, 1), 1),
        ])
        .unwrap();
        assert!(!data.is_chronological());
        assert_eq!(data.subscribers(), vec![2.0, 1.0]);
        assert_eq!(data.dataframe().height(), 2);
    }

    #[test]
    fn test_empty_observations() {
        assert!(SubscriberData::from_observations(Vec::new()).is_err());
    }
}
