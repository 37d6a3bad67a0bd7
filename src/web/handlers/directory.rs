//! Read-only catalog projections: stats, tiles, listings, search, playback.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::directory::{self, ChannelFilter};
use crate::errors::AppError;
use crate::web::{
    AppState,
    responses::{handle_error, ok},
};

#[derive(Debug, Default, Deserialize)]
pub struct ChannelQuery {
    pub category: Option<String>,
    pub country: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.snapshot().await;
    ok(directory::stats(&catalog))
}

pub async fn categories(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.snapshot().await;
    ok(directory::category_tiles(
        &catalog,
        state.config.directory.category_tiles,
    ))
}

pub async fn countries(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.snapshot().await;
    ok(directory::country_tiles(
        &catalog,
        state.config.directory.country_tiles,
    ))
}

pub async fn latest_channels(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.snapshot().await;
    ok(directory::latest_channels(
        &catalog,
        state.config.directory.latest_channels,
    ))
}

/// `limit` is clamped to the configured page size.
pub async fn list_channels(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> impl IntoResponse {
    let page_limit = state.config.directory.channel_page_limit;
    let filter = ChannelFilter {
        category: non_empty(query.category),
        country: non_empty(query.country),
        limit: query.limit.unwrap_or(page_limit).min(page_limit),
    };
    debug!(target = "web.directory", ?filter, "listing channels");

    let catalog = state.catalog.snapshot().await;
    ok(directory::channels(&catalog, &filter))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog.snapshot().await;
    ok(directory::search(
        &catalog,
        &query.q,
        state.config.directory.search_limit,
    ))
}

pub async fn playback(State(state): State<AppState>, Path(channel_id): Path<String>) -> Response {
    let catalog = state.catalog.snapshot().await;
    match directory::playback_descriptor(&catalog, &channel_id, &state.config.player.fallback_route) {
        Some(descriptor) => ok(descriptor).into_response(),
        None => handle_error(AppError::not_found("playable channel", channel_id)),
    }
}
