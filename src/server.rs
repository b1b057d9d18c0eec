//! # HTTP Front Door
//!
//! This module defines the `axum` router that exposes the collector's
//! readings. Every route is read-only and independent: each request runs the
//! collector on its own and nothing is cached between requests.
//!
//! | Route       | Body                                           |
//! |-------------|------------------------------------------------|
//! | `/`         | HTML page with every `SystemInfo` field        |
//! | `/info`     | `{"nome": ...}`                                |
//! | `/metricas` | `SystemInfo` as a flat JSON object             |

use crate::collector::{CollectorError, SystemCollector};
use crate::core::{NameInfo, SystemInfo, DISPLAY_NAME};
use crate::render::IndexPage;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub collector: Arc<SystemCollector>,
    pub index_page: Arc<IndexPage>,
}

impl AppState {
    pub fn new(collector: Arc<SystemCollector>, index_page: Arc<IndexPage>) -> Self {
        Self {
            collector,
            index_page,
        }
    }
}

/// Failures surfaced to HTTP clients as a generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Collector(#[from] CollectorError),

    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        if matches!(self, ApiError::Collector(_)) {
            metrics::counter!("collector_failures_total").increment(1);
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal server error" })),
        )
            .into_response()
    }
}

/// Builds the router serving `/`, `/info` and `/metricas`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/info", get(info))
        .route("/metricas", get(metricas))
        .with_state(state)
}

async fn system_info(state: &AppState) -> Result<SystemInfo, ApiError> {
    let snapshot = state.collector.collect().await?;
    Ok(snapshot.with_name(DISPLAY_NAME))
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    debug!(route = "/", "Handling request");
    metrics::counter!("http_requests_total", "route" => "/").increment(1);

    let info = system_info(&state).await?;
    Ok(Html(state.index_page.render(&info)?))
}

async fn info() -> Json<NameInfo> {
    debug!(route = "/info", "Handling request");
    metrics::counter!("http_requests_total", "route" => "/info").increment(1);
    Json(NameInfo::default())
}

async fn metricas(State(state): State<AppState>) -> Result<Json<SystemInfo>, ApiError> {
    debug!(route = "/metricas", "Handling request");
    metrics::counter!("http_requests_total", "route" => "/metricas").increment(1);
    Ok(Json(system_info(&state).await?))
}
