use rstest::rstest;
use subscriber_forecast::params::{ForecastParams, Horizon, ModelOrder};
use subscriber_forecast::ForecastError;

#[rstest]
#[case(0, 0, 0)]
#[case(5, 2, 5)]
#[case(1, 1, 1)]
#[case(3, 0, 4)]
fn test_orders_within_bounds(#[case] p: usize, #[case] d: usize, #[case] q: usize) {
    let order = ModelOrder::new(p, d, q).unwrap();
    assert_eq!((order.p(), order.d(), order.q()), (p, d, q));
    assert_eq!(order.to_string(), format!("ARIMA({},{},{})", p, d, q));
}

#[rstest]
#[case(6, 0, 0)]
#[case(0, 3, 0)]
#[case(0, 0, 6)]
#[case(9, 9, 9)]
fn test_orders_out_of_bounds(#[case] p: usize, #[case] d: usize, #[case] q: usize) {
    let result = ModelOrder::new(p, d, q);
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}

#[rstest]
#[case(1, true)]
#[case(10, true)]
#[case(0, false)]
#[case(11, false)]
fn test_horizon_bounds(#[case] steps: usize, #[case] valid: bool) {
    assert_eq!(Horizon::new(steps).is_ok(), valid);
}

#[test]
fn test_params_validate_every_field() {
    let params = ForecastParams {
        d: 3,
        ..Default::default()
    };
    let err = params.validate().unwrap_err();
    assert!(err.to_string().contains("difference order"));
    assert!(err.is_client_error());
}
