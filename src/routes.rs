//! REST routes: lookup endpoints and health checks.

use std::sync::Arc;

use announce_core::{ApiReply, AppError, require_identifier};
use announce_sheets::DatasetSource;
use announce_telemetry::record_lookup;
use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::{info, instrument};

use crate::announcement::Announcement;
use crate::lookup::{LookupOutcome, Record, resolve};

/// Reply for a well-formed identifier absent from the dataset.
pub const NOT_FOUND_MESSAGE: &str = "NIM tidak ditemukan. Pastikan NIM benar.";

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<dyn DatasetSource>,
}

impl AppState {
    pub fn new(dataset: impl DatasetSource + 'static) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

/// Query string of the lookup endpoints.
///
/// Extracted from raw key/value pairs so that repeated or unknown parameters
/// never reject the request. The first `nim` wins.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LookupQuery {
    pub nim: Option<String>,
}

impl LookupQuery {
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            nim: pairs
                .into_iter()
                .find_map(|(key, value)| (key == "nim").then_some(value)),
        }
    }
}

/// Readiness response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    dataset: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    const fn healthy() -> Self {
        Self {
            status: "healthy",
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            message: Some(message.into()),
        }
    }
}

/// Build REST routes with the given application state.
pub fn rest_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "announce-service" }))
        .route("/health", get(|| async { "OK" }))
        .route("/health/live", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .route("/api/check", get(check_handler))
        .route("/api/announcement", get(announcement_handler))
        .with_state(state)
}

/// Validate, fetch the grid and resolve. Counts every outcome.
#[instrument(skip_all, fields(nim = raw.unwrap_or_default().trim()))]
async fn lookup(state: &AppState, raw: Option<&str>) -> Result<LookupOutcome, AppError> {
    let result = fetch_and_resolve(state, raw).await;

    record_lookup(match &result {
        Ok(LookupOutcome::Found(_)) => "found",
        Ok(LookupOutcome::NotFound) => "not_found",
        Err(e) => e.kind(),
    });

    if matches!(result, Ok(LookupOutcome::NotFound)) {
        info!("Identifier not found");
    }

    result
}

async fn fetch_and_resolve(state: &AppState, raw: Option<&str>) -> Result<LookupOutcome, AppError> {
    let nim = require_identifier(raw)?;
    let grid = state.dataset.fetch_grid().await?;
    resolve(&grid, nim)
}

async fn check_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiReply<Record>>, AppError> {
    let query = LookupQuery::from_pairs(pairs);
    Ok(Json(match lookup(&state, query.nim.as_deref()).await? {
        LookupOutcome::Found(record) => ApiReply::success(record),
        LookupOutcome::NotFound => ApiReply::failure(NOT_FOUND_MESSAGE),
    }))
}

async fn announcement_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiReply<Announcement>>, AppError> {
    let query = LookupQuery::from_pairs(pairs);
    Ok(Json(match lookup(&state, query.nim.as_deref()).await? {
        LookupOutcome::Found(record) => ApiReply::success(Announcement::from_record(record)),
        LookupOutcome::NotFound => ApiReply::failure(NOT_FOUND_MESSAGE),
    }))
}

async fn readiness_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let dataset = if state.dataset.is_configured() {
        CheckResult::healthy()
    } else {
        CheckResult::unhealthy("Dataset credentials are not configured")
    };

    Json(HealthResponse {
        status: dataset.status,
        version: VERSION,
        dataset,
    })
}
