use std::sync::Arc;
use tracing::info;

use crate::geocode::{Geocoder, GoogleGeocoder};

const DEFAULT_PORT: u16 = 5000;

#[derive(Clone)]
pub(super) struct ServeCfg {
    pub host: String,
    pub port: u16,
}

pub(super) fn parse_bool_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(default)
}

/// Empty or unparsable values fall back to the default port.
fn parse_port(raw: Option<String>) -> u16 {
    raw.and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// | Env var | Default   |
/// |---------|-----------|
/// | `HOST`  | `0.0.0.0` |
/// | `PORT`  | `5000`    |
pub(super) fn load_serve_cfg() -> ServeCfg {
    ServeCfg {
        host: std::env::var("HOST")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "0.0.0.0".into()),
        port: parse_port(std::env::var("PORT").ok()),
    }
}

/// `None` when no geocoding credential is configured.
pub(super) fn geocoder_from_env() -> Option<Arc<dyn Geocoder>> {
    let geocoder = GoogleGeocoder::from_env()?;
    info!("Geocoder: {geocoder}");
    Some(Arc::new(geocoder))
}
