//! Place-name → coordinates via the Google Maps Geocoding API.
//!
//! One plain request per lookup: no timeout, no retry. Callers decide what
//! a failure means for them.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// One resolved place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeHit {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best-first hits; an empty list means the provider knows no such place.
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeHit>>;
}

// ─────────────────────────── Wire types ──────────────────────────────────

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize, Debug)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// `ZERO_RESULTS` is a normal "not found"; every other non-`OK` status is
/// a provider error (bad key, quota, malformed request).
fn into_hits(body: GeocodeResponse) -> Result<Vec<GeocodeHit>> {
    match body.status.as_str() {
        "OK" => Ok(body
            .results
            .into_iter()
            .map(|r| GeocodeHit {
                lat: r.geometry.location.lat,
                lng: r.geometry.location.lng,
                formatted_address: r.formatted_address,
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(match body.error_message {
            Some(msg) => anyhow!("geocoding failed: {status}: {msg}"),
            None => anyhow!("geocoding failed: {status}"),
        }),
    }
}

// ─────────────────────────── GoogleGeocoder ──────────────────────────────

pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
            api_key,
        }
    }

    /// `None` when `GOOGLE_MAPS_API_KEY` is unset or blank.
    ///
    /// | Env var                | Default               |
    /// |------------------------|-----------------------|
    /// | `GOOGLE_MAPS_API_KEY`  | —                     |
    /// | `GOOGLE_MAPS_ENDPOINT` | Google geocode JSON   |
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("GOOGLE_MAPS_API_KEY").ok()?;
        if key.trim().is_empty() {
            return None;
        }
        let endpoint = std::env::var("GOOGLE_MAPS_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Some(Self::new(key.trim().to_string(), endpoint))
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeHit>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let raw = resp.text().await.unwrap_or_default();
            return Err(anyhow!("geocode request failed: {status} body={raw}"));
        }
        let body: GeocodeResponse = resp.json().await?;
        debug!(
            "Geocode {address:?}: status={}, {} result(s)",
            body.status,
            body.results.len()
        );
        into_hits(body)
    }
}

impl std::fmt::Display for GoogleGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleGeocoder(endpoint={})", self.endpoint)
    }
}
