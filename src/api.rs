//! JSON HTTP surface: extraction, geocoding, health.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::extract::{ExtractionResult, LocationExtractor};
use crate::geocode::{GeocodeHit, Geocoder};

/// Shared across handlers; both members are immutable.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<LocationExtractor>,
    /// `None` when no provider credential is configured.
    pub geocoder: Option<Arc<dyn Geocoder>>,
}

// ─────────────────────────── Errors ──────────────────────────────────────

pub enum ApiError {
    /// Missing or malformed request field.
    BadRequest(String),
    /// Valid request, provider has no result.
    NotFound(String),
    GeocoderNotConfigured,
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::GeocoderNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Google Maps API not configured".to_string(),
            ),
            Self::Internal(e) => {
                error!("Request failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

// ─────────────────────────── Handlers ────────────────────────────────────

async fn index() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

#[derive(Deserialize)]
struct ExtractRequest {
    text: Option<String>,
}

async fn extract_locations(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let Json(req) = payload?;
    let text = req
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Text is required".into()))?;

    let locations = state.extractor.extract(&text);
    debug!("Extracted {} location(s)", locations.len());
    Ok(Json(locations))
}

#[derive(Deserialize)]
struct GeocodeRequest {
    location: Option<String>,
}

async fn geocode(
    State(state): State<AppState>,
    payload: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Json<GeocodeHit>, ApiError> {
    let Json(req) = payload?;
    let location = req
        .location
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Location is required".into()))?;
    let geocoder = state
        .geocoder
        .as_ref()
        .ok_or(ApiError::GeocoderNotConfigured)?;

    let hits = geocoder.geocode(&location).await?;
    hits.into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Location '{location}' not found")))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/extract_locations", post(extract_locations))
        .route("/geocode", post(geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
