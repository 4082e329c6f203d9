//! Forecast and raw data tables

use super::escape_html;
use crate::data::{Observation, SubscriberData, DATE_FORMAT, SUBSCRIBERS_COLUMN, TIME_COLUMN};
use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::utils::format_thousands;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Header of the forecast value column
pub const FORECAST_COLUMN: &str = "Forecast";

fn html_table(headers: &[&str], rows: impl Iterator<Item = [String; 2]>) -> String {
    let mut html = String::from(r#"<table class="data-table"><thead><tr>"#);
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr></thead><tbody>");
    for [date, value] in rows {
        html.push_str(&format!(
            r#"<tr><td>{}</td><td class="num">{}</td></tr>"#,
            escape_html(&date),
            escape_html(&value)
        ));
    }
    html.push_str("</tbody></table>");
    html
}

/// Forecast table as HTML, one row per forecast quarter
pub fn forecast_table_html(forecast: &ForecastResult) -> String {
    html_table(
        &[TIME_COLUMN, FORECAST_COLUMN],
        forecast.points().iter().map(|p| {
            [
                p.timestamp.format(DATE_FORMAT).to_string(),
                format_thousands(p.forecast),
            ]
        }),
    )
}

/// Raw observations as HTML, in file order
pub fn raw_data_table_html(observations: &[Observation]) -> String {
    html_table(
        &[TIME_COLUMN, SUBSCRIBERS_COLUMN],
        observations.iter().map(|o| {
            [
                o.timestamp.format(DATE_FORMAT).to_string(),
                format_thousands(o.subscribers),
            ]
        }),
    )
}

/// Forecast table as aligned plain text
pub fn forecast_table_text(forecast: &ForecastResult) -> String {
    let rows: Vec<(String, String)> = forecast
        .points()
        .iter()
        .map(|p| {
            (
                p.timestamp.format(DATE_FORMAT).to_string(),
                format_thousands(p.forecast),
            )
        })
        .collect();
    let value_width = rows
        .iter()
        .map(|(_, v)| v.len())
        .max()
        .unwrap_or(0)
        .max(FORECAST_COLUMN.len());
    let date_width = TIME_COLUMN.len().max(10);

    let mut text = format!(
        "{:<date_width$}  {:>value_width$}\n",
        TIME_COLUMN, FORECAST_COLUMN
    );
    text.push_str(&format!(
        "{}  {}\n",
        "-".repeat(date_width),
        "-".repeat(value_width)
    ));
    for (date, value) in rows {
        text.push_str(&format!("{:<date_width$}  {:>value_width$}\n", date, value));
    }
    text
}

/// Raw data as printed by the underlying data frame
pub fn raw_data_table_text(data: &SubscriberData) -> String {
    format!("{}", data.dataframe())
}

/// Write the forecast table as CSV (`Time Period,Forecast`)
pub fn write_forecast_csv<W: Write>(writer: W, forecast: &ForecastResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([TIME_COLUMN, FORECAST_COLUMN])?;
    for point in forecast.points() {
        csv_writer.write_record([
            point.timestamp.format(DATE_FORMAT).to_string(),
            point.forecast.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export the forecast table to a CSV file
pub fn export_forecast_csv<P: AsRef<Path>>(path: P, forecast: &ForecastResult) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_forecast_csv(BufWriter::new(file), forecast)?;
    info!(path = %path.display(), rows = forecast.horizon(), "exported forecast table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_raw_data_table_html() {
        let observations = vec![
            Observation::new(NaiveDate::from_ymd_opt(2013, 4, 1).unwrap(), 34_240_000),
            Observation::new(NaiveDate::from_ymd_opt(2013, 7, 1).unwrap(), 35_640_000),
        ];
        let html = raw_data_table_html(&observations);
        assert!(html.contains("<th>Time Period</th><th>Subscribers</th>"));
        assert!(html.contains("<td>01/04/2013</td><td class=\"num\">34,240,000</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }
}
