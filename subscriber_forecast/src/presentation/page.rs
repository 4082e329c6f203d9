//! The dashboard page

use super::chart::overlay_chart_svg;
use super::diagnostics::{correlogram_svg, ACF_TITLE, PACF_TITLE};
use super::escape_html;
use super::tables::{forecast_table_html, raw_data_table_html};
use crate::config::DashboardConfig;
use crate::dashboard::DashboardView;
use crate::error::Result;
use crate::models::ModelSummary;
use crate::params::{
    ForecastParams, Integration, AR_ORDER_RANGE, DIFFERENCE_ORDER_RANGE, HORIZON_RANGE,
    MA_ORDER_RANGE,
};
use std::ops::RangeInclusive;

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; color: #222; display: flex; }
aside { width: 280px; min-height: 100vh; padding: 1rem 1.25rem; background: #f0f2f6; box-sizing: border-box; }
aside h2 { font-size: 1.05rem; margin-top: 1.5rem; }
aside label { display: block; margin: 0.6rem 0 0.2rem; font-size: 0.9rem; }
aside input, aside select { width: 100%; box-sizing: border-box; }
.info { background: #e1ecf9; border-radius: 4px; padding: 0.6rem; font-size: 0.85rem; }
main { flex: 1; padding: 1rem 2rem; min-width: 0; }
.chart svg { max-width: 100%; height: auto; }
.diagnostics { display: flex; flex-wrap: wrap; gap: 1rem; }
.data-table { border-collapse: collapse; margin: 0.5rem 0 1.5rem; }
.data-table th, .data-table td { border: 1px solid #ddd; padding: 0.3rem 0.8rem; }
.data-table td.num { text-align: right; font-variant-numeric: tabular-nums; }
.summary { font-size: 0.85rem; color: #555; }
"#;

fn number_input(name: &str, label: &str, value: usize, range: &RangeInclusive<usize>) -> String {
    format!(
        r#"<label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="{min}" max="{max}" step="1" value="{value}" required>"#,
        label = escape_html(label),
        min = range.start(),
        max = range.end(),
    )
}

fn integration_select(selected: Integration) -> String {
    let mut html = String::from(
        r#"<label for="integration">Integration</label><select id="integration" name="integration">"#,
    );
    for mode in [Integration::PreDifferenced, Integration::ModelOnly] {
        let flag = if mode == selected { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{mode}"{flag}>{mode}</option>"#));
    }
    html.push_str("</select>");
    html
}

/// Sidebar with the parameter form and the info sections
fn sidebar(config: &DashboardConfig, params: &ForecastParams) -> String {
    format!(
        concat!(
            "<aside>",
            r#"<form method="get" action="/">"#,
            "<h2>Select Forecasting Parameters</h2>{p}{d}{q}{integration}",
            "<h2>Make Forecasts</h2>{horizon}",
            r#"<p><button type="submit">Forecast</button></p>"#,
            "</form>",
            r#"<p><a href="/api/forecast?{query}">Download as JSON</a></p>"#,
            "<h2>ACF and PACF Plots</h2>",
            r##"<p><a href="#acf">ACF</a> &middot; <a href="#pacf">PACF</a></p>"##,
            r#"<h2>Data Source</h2><div class="info">{source}</div>"#,
            r#"<h2>About</h2><div class="info">{about}</div>"#,
            "</aside>"
        ),
        p = number_input("p", "p (AR order)", params.p, &AR_ORDER_RANGE),
        d = number_input("d", "d (Difference order)", params.d, &DIFFERENCE_ORDER_RANGE),
        q = number_input("q", "q (MA order)", params.q, &MA_ORDER_RANGE),
        integration = integration_select(params.integration),
        horizon = number_input(
            "horizon",
            "Number of Quarters to Forecast",
            params.horizon,
            &HORIZON_RANGE
        ),
        query = escape_html(&params.to_query()),
        source = escape_html(&config.data_source),
        about = escape_html(&config.about),
    )
}

fn coefficients(values: &[f64]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values
            .iter()
            .map(|v| format!("{:.4}", v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn model_summary(summary: &ModelSummary) -> String {
    let mut html = format!(
        r#"<p class="summary">{} &middot; AR: {} &middot; MA: {} &middot; intercept {:.2} &middot; &sigma;&sup2; {:.4e} &middot; AIC {:.2} &middot; BIC {:.2}"#,
        escape_html(&summary.name),
        coefficients(&summary.ar_coefficients),
        coefficients(&summary.ma_coefficients),
        summary.intercept,
        summary.sigma2,
        summary.aic,
        summary.bic
    );
    if !summary.converged {
        html.push_str(&format!(
            " &middot; optimiser stopped after {} iterations",
            summary.iterations
        ));
    }
    html.push_str("</p>");
    html
}

/// Render the complete dashboard as one HTML document
pub fn render_page(config: &DashboardConfig, view: &DashboardView) -> Result<String> {
    let title = escape_html(&config.title);
    let chart = overlay_chart_svg(&config.chart_title, &view.observations, &view.forecast)?;
    let acf = correlogram_svg(ACF_TITLE, &view.acf)?;
    let pacf = correlogram_svg(PACF_TITLE, &view.pacf)?;
    Ok(format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            "<title>{title}</title><style>{style}</style></head><body>",
            "{sidebar}",
            "<main>",
            "<h1>{title}</h1><p>{description}</p>",
            r#"<section class="chart">{chart}</section>"#,
            "<h2>Forecasted Subscription Counts</h2>{forecast_table}{summary}",
            r#"<section class="diagnostics"><div id="acf" class="chart">{acf}</div><div id="pacf" class="chart">{pacf}</div></section>"#,
            "<h2>Subscription Data</h2>{raw_table}",
            "</main></body></html>\n"
        ),
        title = title,
        style = STYLE,
        sidebar = sidebar(config, &view.params),
        description = escape_html(&config.description),
        chart = chart,
        forecast_table = forecast_table_html(&view.forecast),
        summary = model_summary(view.forecast.model()),
        acf = acf,
        pacf = pacf,
        raw_table = raw_data_table_html(&view.observations),
    ))
}
