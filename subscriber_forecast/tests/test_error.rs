use plotters::drawing::DrawingAreaErrorKind;
use std::io;
use subscriber_forecast::ForecastError;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let parse_error = "many".parse::<i64>().unwrap_err();
    let forecast_error = ForecastError::from(parse_error);
    assert!(matches!(forecast_error, ForecastError::ParseError(_)));

    let date_error = chrono::NaiveDate::parse_from_str("2013-04-01", "%d/%m/%Y").unwrap_err();
    assert!(matches!(
        ForecastError::from(date_error),
        ForecastError::ParseError(_)
    ));

    let math_error = series_math::MathError::InsufficientData("need 3 points".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(forecast_error.to_string().contains("need 3 points"));
}

#[test]
fn test_error_display() {
    let error = ForecastError::ValidationError("p must be between 0 and 5, got 7".to_string());
    assert_eq!(
        error.to_string(),
        "Validation error: p must be between 0 and 5, got 7"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_chart_errors_are_render_errors() {
    let chart_error = DrawingAreaErrorKind::<io::Error>::LayoutError;
    let error = ForecastError::from(chart_error);
    assert!(matches!(error, ForecastError::RenderError(_)));
    assert!(!error.is_client_error());
}

#[test]
fn test_client_errors() {
    assert!(ForecastError::ValidationError("horizon".into()).is_client_error());
    assert!(ForecastError::InvalidParameter("integration".into()).is_client_error());
    assert!(!ForecastError::DataError("empty".into()).is_client_error());
    assert!(!ForecastError::ForecastingError("fit".into()).is_client_error());
}
