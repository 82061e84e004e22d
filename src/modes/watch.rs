use crate::extract::LocationExtractor;
use crate::geocode::Geocoder;
use crate::telegram::{self, ChannelPost, TgCfg};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::shared::{geocoder_from_env, parse_bool_env};

pub(super) async fn run() -> Result<()> {
    let tg = TgCfg::from_env()?;

    let extractor = Arc::new(LocationExtractor::from_env());
    info!("Extractor: {extractor}");

    let geocoder = if parse_bool_env("WATCH_GEOCODE", false) {
        let geocoder = geocoder_from_env();
        if geocoder.is_none() {
            warn!("WATCH_GEOCODE is set but GOOGLE_MAPS_API_KEY is missing; not geocoding");
        }
        geocoder
    } else {
        None
    };

    let (tx, mut rx) = mpsc::channel::<ChannelPost>(256);
    let consumer = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Some(post) = rx.recv().await {
            seen += 1;
            report(&extractor, geocoder.as_deref(), &post).await;
        }
        seen
    });

    info!("Running in watch mode. Waiting for new posts...");
    let forwarded = telegram::forward_posts(&tg, tx).await;
    let seen = consumer.await.context("post consumer panicked")?;
    info!("Watch finished after {seen} post(s)");
    forwarded
}

/// Extract locations from one post and log them, geocoding each name when
/// a geocoder is given.
async fn report(
    extractor: &LocationExtractor,
    geocoder: Option<&dyn Geocoder>,
    post: &ChannelPost,
) {
    let locations = extractor.extract(&post.text);
    if locations.is_empty() {
        debug!("No locations in post from {}", post.channel_title);
        return;
    }

    match serde_json::to_string(&locations) {
        Ok(json) => info!(
            "{} (id={}): {} location(s) {json}",
            post.channel_title,
            post.channel_id,
            locations.len()
        ),
        Err(e) => warn!("Failed to serialize locations: {e}"),
    }

    let Some(geocoder) = geocoder else {
        return;
    };
    for name in locations.keys() {
        match geocoder.geocode(name).await {
            Ok(hits) => match hits.first() {
                Some(hit) => info!(
                    "{name} → {:.5},{:.5} ({})",
                    hit.lat, hit.lng, hit.formatted_address
                ),
                None => info!("{name}: not found"),
            },
            Err(e) => warn!("Geocoding {name:?} failed: {e:#}"),
        }
    }
}
