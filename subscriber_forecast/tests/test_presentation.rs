use pretty_assertions::assert_eq;
use subscriber_forecast::data::DataLoader;
use subscriber_forecast::dashboard::build_view;
use subscriber_forecast::presentation::page::render_page;
use subscriber_forecast::presentation::tables::{
    export_forecast_csv, forecast_table_html, forecast_table_text, write_forecast_csv,
};
use subscriber_forecast::{DashboardConfig, DashboardView, ForecastParams};
use tempfile::tempdir;

const SAMPLE_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/subscriptions.csv");

fn view(horizon: usize) -> DashboardView {
    let data = DataLoader::from_csv(SAMPLE_DATA).unwrap();
    let params = ForecastParams {
        p: 0,
        d: 1,
        q: 0,
        horizon,
        ..Default::default()
    };
    build_view(data, &params, 0.95).unwrap()
}

#[test]
fn test_csv_export() {
    let view = view(3);
    let dir = tempdir().unwrap();
    let path = dir.path().join("forecast.csv");

    export_forecast_csv(&path, &view.forecast).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Time Period,Forecast\n01/10/2023,237940000\n01/01/2024,245180000\n01/04/2024,252420000\n"
    );
}

#[test]
fn test_write_forecast_csv_to_buffer() {
    let view = view(1);
    let mut buffer = Vec::new();
    write_forecast_csv(&mut buffer, &view.forecast).unwrap();

    let content = String::from_utf8(buffer).unwrap();
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn test_forecast_tables() {
    let view = view(2);

    let text = forecast_table_text(&view.forecast);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Time Period"));
    assert!(lines[2].starts_with("01/10/2023"));
    assert!(lines[2].ends_with("237,940,000"));

    let html = forecast_table_html(&view.forecast);
    assert_eq!(html.matches("<tr>").count(), 3);
    assert!(html.contains("<th>Forecast</th>"));
}

#[test]
fn test_page_escapes_configured_text() {
    let config = DashboardConfig::default().with_title("Growth <beta>");
    let html = render_page(&config, &view(2)).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>Growth &lt;beta&gt;</h1>"));
    assert!(!html.contains("<beta>"));
}

#[test]
fn test_page_embeds_plotted_charts() {
    let html = render_page(&DashboardConfig::default(), &view(4)).unwrap();

    // overlay chart plus the two correlograms
    assert_eq!(html.matches("<svg").count(), 3);
    assert!(html.contains("Quarterly Subscription Forecast"));
    assert!(html.contains("Original Data"));
    // four forecast markers and one marker per ACF and PACF lag
    let view = view(4);
    let markers = 4 + view.acf.values.len() + view.pacf.values.len();
    assert_eq!(html.matches("<circle").count(), markers);
    assert_eq!(html.matches("<polygon").count(), 2);
}
