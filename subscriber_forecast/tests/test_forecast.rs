use approx::assert_abs_diff_eq;
use chrono::{Months, NaiveDate};
use pretty_assertions::assert_eq;
use subscriber_forecast::data::{DataLoader, Observation};
use subscriber_forecast::forecast::Forecaster;
use subscriber_forecast::params::{Horizon, Integration, ModelOrder};
use subscriber_forecast::transform::DifferencedSeries;
use subscriber_forecast::ForecastError;

const SAMPLE_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/subscriptions.csv");

fn sample_series() -> (Vec<Observation>, DifferencedSeries) {
    let data = DataLoader::from_csv(SAMPLE_DATA).unwrap();
    let observations = data.observations().to_vec();
    let differenced = DifferencedSeries::from_observations(&observations).unwrap();
    (observations, differenced)
}

fn quarterly(counts: &[i64]) -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| Observation::new(start + Months::new(3 * i as u32), c))
        .collect()
}

fn forecaster(p: usize, d: usize, q: usize, horizon: usize) -> Forecaster {
    Forecaster::new(ModelOrder::new(p, d, q).unwrap(), Horizon::new(horizon).unwrap())
}

#[test]
fn test_differencing_round_trip() {
    let (observations, differenced) = sample_series();
    assert_eq!(differenced.len(), observations.len() - 1);
    assert_eq!(differenced.reconstruct().unwrap(), observations);
}

#[test]
fn test_forecast_has_horizon_quarterly_points() {
    let (observations, differenced) = sample_series();
    let last = observations.last().unwrap().timestamp;

    for horizon in 1..=10 {
        let result = forecaster(1, 1, 1, horizon).forecast(&differenced).unwrap();
        assert_eq!(result.points().len(), horizon);

        let timestamps = result.timestamps();
        for (i, timestamp) in timestamps.iter().enumerate() {
            assert_eq!(*timestamp, last + Months::new(3 * (i as u32 + 1)));
        }
        assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_forecasts_are_rounded_values() {
    let (_, differenced) = sample_series();
    let result = forecaster(2, 0, 1, 6).forecast(&differenced).unwrap();

    for point in result.points() {
        assert!(point.value.is_finite());
        assert_eq!(point.forecast, point.value.round_ties_even() as i64);
    }
}

#[test]
fn test_constant_increments_continue_the_trend() {
    let observations = quarterly(&[100, 110, 120, 130, 140, 150, 160, 170]);
    let differenced = DifferencedSeries::from_observations(&observations).unwrap();

    let result = forecaster(0, 0, 0, 2).forecast(&differenced).unwrap();

    assert_abs_diff_eq!(result.values()[0], 180.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.values()[1], 190.0, epsilon = 1e-6);
    assert_eq!(result.forecasts(), vec![180, 190]);
}

#[test]
fn test_single_step_white_noise_model() {
    let (_, differenced) = sample_series();
    let result = forecaster(0, 0, 0, 1).forecast(&differenced).unwrap();

    assert_eq!(result.horizon(), 1);
    assert_eq!(result.points().len(), 1);
    assert_eq!(result.model().name, "ARIMA(0,0,0)");
}

#[test]
fn test_random_walk_on_differences_repeats_last_increment() {
    let (observations, differenced) = sample_series();
    let last = observations[observations.len() - 1].subscribers;
    let increment = last - observations[observations.len() - 2].subscribers;

    let result = forecaster(0, 1, 0, 3).forecast(&differenced).unwrap();

    assert_eq!(
        result.forecasts(),
        vec![last + increment, last + 2 * increment, last + 3 * increment]
    );
}

#[test]
fn test_model_only_random_walk_stays_at_last_level() {
    let (observations, differenced) = sample_series();
    let last = observations.last().unwrap().subscribers;

    let result = forecaster(0, 1, 0, 4)
        .with_integration(Integration::ModelOnly)
        .forecast(&differenced)
        .unwrap();

    assert_eq!(result.forecasts(), vec![last; 4]);
    assert_eq!(result.model().nobs, observations.len());
}

#[test]
fn test_too_short_for_order() {
    let observations = quarterly(&[10, 12, 15, 19, 24]);
    let differenced = DifferencedSeries::from_observations(&observations).unwrap();

    let err = forecaster(5, 2, 5, 3).forecast(&differenced).unwrap_err();
    assert!(matches!(err, ForecastError::ForecastingError(_)));
}
