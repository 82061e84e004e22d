use crate::api::{self, AppState};
use crate::extract::LocationExtractor;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::shared::{geocoder_from_env, load_serve_cfg};

pub(super) async fn run() -> Result<()> {
    let cfg = load_serve_cfg();

    let extractor = LocationExtractor::from_env();
    info!("Extractor: {extractor}");

    let geocoder = geocoder_from_env();
    if geocoder.is_none() {
        warn!("GOOGLE_MAPS_API_KEY is not set; /geocode will report it as unconfigured");
    }

    let app = api::router(AppState {
        extractor: Arc::new(extractor),
        geocoder,
    });

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested.");
}
