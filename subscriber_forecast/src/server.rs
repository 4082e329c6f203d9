//! HTTP front end of the dashboard
//!
//! Every request runs the full pipeline on the blocking thread pool. The
//! configuration is the only state shared between requests.

use crate::config::DashboardConfig;
use crate::dashboard::{run_pipeline, DashboardView};
use crate::error::ForecastError;
use crate::params::{ForecastParams, ForecastQuery};
use crate::presentation::chart::overlay_chart_svg;
use crate::presentation::diagnostics::{correlogram_svg, ACF_TITLE, PACF_TITLE};
use crate::presentation::page::render_page;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Error returned by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// The pipeline failed
    Forecast(ForecastError),
    /// The query string could not be decoded
    BadQuery(String),
    /// The pipeline task did not complete
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Forecast(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Forecast(ForecastError::ForecastingError(_))
            | ApiError::Forecast(ForecastError::MathError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Forecast(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Forecast(err) => write!(f, "{}", err),
            ApiError::BadQuery(msg) => write!(f, "Invalid query: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        ApiError::Forecast(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "request failed");
        } else {
            warn!(status = status.as_u16(), %message, "request rejected");
        }

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "status": status.as_u16(),
            })),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Build the router with all dashboard routes
pub fn build_router(config: Arc<DashboardConfig>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/forecast", get(forecast_json))
        .route("/charts/forecast.svg", get(forecast_chart))
        .route("/charts/acf.svg", get(acf_chart))
        .route("/charts/pacf.svg", get(pacf_chart))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(config)
}

/// Bind to the configured address and serve until Ctrl-C
pub async fn serve(config: DashboardConfig) -> std::io::Result<()> {
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        %address,
        data = %config.data_path.display(),
        "dashboard listening"
    );

    axum::serve(listener, build_router(Arc::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutting down");
}

fn resolve(
    config: &DashboardConfig,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<ForecastParams> {
    let Query(query) = query?;
    Ok(query.resolve(&config.defaults))
}

/// Run the pipeline off the async runtime
async fn compute(config: Arc<DashboardConfig>, params: ForecastParams) -> ApiResult<DashboardView> {
    tokio::task::spawn_blocking(move || run_pipeline(&config, &params))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn svg(body: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], body).into_response()
}

async fn dashboard_page(
    State(config): State<Arc<DashboardConfig>>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<Html<String>> {
    let params = resolve(&config, query)?;
    let view = compute(config.clone(), params).await?;
    Ok(Html(render_page(&config, &view)?))
}

async fn forecast_json(
    State(config): State<Arc<DashboardConfig>>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<Json<DashboardView>> {
    let params = resolve(&config, query)?;
    Ok(Json(compute(config, params).await?))
}

async fn forecast_chart(
    State(config): State<Arc<DashboardConfig>>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let params = resolve(&config, query)?;
    let view = compute(config.clone(), params).await?;
    Ok(svg(overlay_chart_svg(
        &config.chart_title,
        &view.observations,
        &view.forecast,
    )?))
}

async fn acf_chart(
    State(config): State<Arc<DashboardConfig>>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let params = resolve(&config, query)?;
    let view = compute(config, params).await?;
    Ok(svg(correlogram_svg(ACF_TITLE, &view.acf)?))
}

async fn pacf_chart(
    State(config): State<Arc<DashboardConfig>>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let params = resolve(&config, query)?;
    let view = compute(config, params).await?;
    Ok(svg(correlogram_svg(PACF_TITLE, &view.pacf)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Forecast(ForecastError::ValidationError("p".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Forecast(ForecastError::ForecastingError("fit".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Forecast(ForecastError::DataError("empty".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::BadQuery("p".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err);
        }
    }
}
