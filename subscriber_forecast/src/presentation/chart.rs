//! History and forecast overlay chart

use crate::data::Observation;
use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::utils::format_thousands;
use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

const SIZE: (u32, u32) = (900, 420);

const HISTORY_COLOR: RGBColor = RGBColor(31, 119, 180);
const FORECAST_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Name of the historical series in the legend
pub const HISTORY_LABEL: &str = "Original Data";
/// Name of the forecast series in the legend
pub const FORECAST_LABEL: &str = "Forecast";

/// Dates are plotted as days since the common era
fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn date_label(day: &i32) -> String {
    NaiveDate::from_num_days_from_ce_opt(*day)
        .map(|date| date.format("%m/%Y").to_string())
        .unwrap_or_default()
}

/// Render history and forecast on a shared time axis as a standalone SVG
pub fn overlay_chart_svg(title: &str, history: &[Observation], forecast: &ForecastResult) -> Result<String> {
    let history_points: Vec<(i32, f64)> = history
        .iter()
        .map(|o| (day_number(o.timestamp), o.subscribers as f64))
        .collect();
    let forecast_points: Vec<(i32, f64)> = forecast
        .points()
        .iter()
        .map(|p| (day_number(p.timestamp), p.forecast as f64))
        .collect();

    let all = || history_points.iter().chain(forecast_points.iter());
    let x_min = all().map(|(x, _)| *x).min().unwrap_or(0);
    let x_max = all().map(|(x, _)| *x).max().unwrap_or(0).max(x_min + 1);
    let mut y_low = all().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let mut y_high = all().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    if !y_low.is_finite() || !y_high.is_finite() {
        y_low = 0.0;
        y_high = 1.0;
    }
    let padding = ((y_high - y_low) * 0.05).max(1.0);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(100)
            .build_cartesian_2d(x_min..x_max, (y_low - padding)..(y_high + padding))?;

        chart
            .configure_mesh()
            .x_labels(8)
            .y_labels(6)
            .x_label_formatter(&date_label)
            .y_label_formatter(&|v: &f64| format_thousands(v.round() as i64))
            .x_desc("Time Period")
            .y_desc("Subscribers")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                history_points.iter().copied(),
                HISTORY_COLOR.stroke_width(2),
            ))?
            .label(HISTORY_LABEL)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], HISTORY_COLOR.stroke_width(2)));

        chart
            .draw_series(LineSeries::new(
                forecast_points.iter().copied(),
                FORECAST_COLOR.stroke_width(2),
            ))?
            .label(FORECAST_LABEL)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST_COLOR.stroke_width(2)));

        chart.draw_series(
            forecast_points
                .iter()
                .map(|&point| Circle::new(point, 3, FORECAST_COLOR.filled())),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastPoint;
    use crate::models::ModelSummary;
    use crate::params::{Horizon, Integration};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> (Vec<Observation>, ForecastResult) {
        let history = vec![
            Observation::new(date(2022, 1, 1), 100),
            Observation::new(date(2022, 4, 1), 120),
            Observation::new(date(2022, 7, 1), 130),
        ];
        let points = vec![ForecastPoint {
            timestamp: date(2022, 10, 1),
            value: 141.4,
            forecast: 141,
        }];
        let summary = ModelSummary {
            name: "ARIMA(0,0,0)".to_string(),
            intercept: 15.0,
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            sigma2: 1.0,
            log_likelihood: -1.0,
            aic: 4.0,
            bic: 4.5,
            converged: true,
            iterations: 0,
            nobs: 2,
        };
        let result = ForecastResult::new(
            points,
            Horizon::new(1).unwrap(),
            Integration::PreDifferenced,
            summary,
        )
        .unwrap();
        (history, result)
    }

    #[test]
    fn test_overlay_contains_both_series() {
        let (history, forecast) = sample();
        let svg = overlay_chart_svg("Quarterly Subscription Forecast", &history, &forecast).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Quarterly Subscription Forecast"));
        assert!(svg.contains(HISTORY_LABEL));
        assert!(svg.contains(FORECAST_LABEL));
        assert!(svg.contains("Time Period"));
        assert!(svg.contains("Subscribers"));
        // one marker per forecast quarter
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn test_empty_history_still_renders() {
        let (_, forecast) = sample();
        let svg = overlay_chart_svg("Forecast", &[], &forecast).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(&day_number(date(2023, 10, 1))), "10/2023");
    }
}
