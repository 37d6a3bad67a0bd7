//! Favorites and recently watched.

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::library::Library;
use crate::web::{AppState, responses::handle_result};

#[derive(Debug, Serialize)]
pub struct FavoriteToggle {
    pub channel_id: String,
    pub is_favorite: bool,
    pub favorites: Vec<String>,
}

/// What a library mutation does with a validated channel id.
#[derive(Debug, Clone, Copy)]
enum Mutation {
    AddFavorite,
    RemoveFavorite,
    RecordWatched,
}

fn channel_id(raw: &str) -> AppResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::validation("channel id must not be empty"));
    }
    Ok(id.to_string())
}

async fn apply(library: &Library, raw_id: &str, mutation: Mutation) -> AppResult<Vec<String>> {
    let id = channel_id(raw_id)?;
    let ids = match mutation {
        Mutation::AddFavorite => library.add_favorite(&id).await?,
        Mutation::RemoveFavorite => library.remove_favorite(&id).await?,
        Mutation::RecordWatched => library.record_watched(&id).await?,
    };
    Ok(ids)
}

async fn toggle(library: &Library, raw_id: &str) -> AppResult<FavoriteToggle> {
    let id = channel_id(raw_id)?;
    let (is_favorite, favorites) = library.toggle_favorite(&id).await?;
    Ok(FavoriteToggle {
        channel_id: id,
        is_favorite,
        favorites,
    })
}

pub async fn list_favorites(State(state): State<AppState>) -> Response {
    handle_result(state.library.favorites().await.map_err(AppError::from))
}

pub async fn add_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    handle_result(apply(&state.library, &id, Mutation::AddFavorite).await)
}

pub async fn remove_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    handle_result(apply(&state.library, &id, Mutation::RemoveFavorite).await)
}

pub async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    handle_result(toggle(&state.library, &id).await)
}

pub async fn list_recent(State(state): State<AppState>) -> Response {
    handle_result(state.library.recently_watched().await.map_err(AppError::from))
}

pub async fn record_recent(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    handle_result(apply(&state.library, &id, Mutation::RecordWatched).await)
}
