//! Utility functions for the subscriber_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Months, NaiveDate};

/// Create future dates for forecasting.
///
/// Date `i` (1-based) is `last_timestamp` advanced by `i * months_per_step`
/// calendar months. Each date is computed from `last_timestamp` directly, so
/// clamping to the end of a shorter month does not carry over:
/// `31/08 + 3 months` is `30/11`, `31/08 + 6 months` is `29/02`.
pub fn future_timestamps(last_timestamp: NaiveDate, horizon: usize, months_per_step: u32) -> Result<Vec<NaiveDate>> {
    if months_per_step == 0 {
        return Err(ForecastError::ValidationError(
            "Forecast step must be at least one month".to_string(),
        ));
    }

    (1..=horizon)
        .map(|i| {
            u32::try_from(i)
                .ok()
                .and_then(|i| months_per_step.checked_mul(i))
                .and_then(|months| last_timestamp.checked_add_months(Months::new(months)))
                .ok_or_else(|| {
                    ForecastError::ValidationError(format!(
                        "Date overflow {} steps after {}",
                        i, last_timestamp
                    ))
                })
        })
        .collect()
}

/// Format an integer with thousands separators, e.g. `1,234,567`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarterly_steps() {
        let dates = future_timestamps(date(2023, 7, 1), 3, 3).unwrap();
        assert_eq!(dates, vec![date(2023, 10, 1), date(2024, 1, 1), date(2024, 4, 1)]);
    }

    #[test]
    fn test_month_end_clamping_does_not_drift() {
        let dates = future_timestamps(date(2023, 8, 31), 2, 3).unwrap();
        assert_eq!(dates, vec![date(2023, 11, 30), date(2024, 2, 29)]);
    }

    #[test]
    fn test_zero_step_and_empty_horizon() {
        assert!(future_timestamps(date(2023, 1, 1), 1, 0).is_err());
        assert!(future_timestamps(date(2023, 1, 1), 0, 3).unwrap().is_empty());
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(future_timestamps(NaiveDate::MAX, 1, 3).is_err());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(-238_390_000), "-238,390,000");
    }
}
