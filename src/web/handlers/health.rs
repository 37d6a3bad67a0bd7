use axum::{extract::State, response::IntoResponse};

use crate::web::{
    AppState,
    responses::{HealthResponse, ok},
};

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.snapshot().await;
    ok(HealthResponse {
        status: "healthy".to_string(),
        app: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_channels: catalog.channels().len(),
        catalog_loaded_at: catalog.loaded_at(),
    })
}
