//! Web layer module
//!
//! Thin axum handlers over the catalog snapshot, the directory projections
//! and the personal library, plus the same-origin fallback player page.
//!
//! - **Handlers**: HTTP request handlers organized by domain
//! - **Responses**: the [`ApiResponse`] envelope and error mapping
//! - **Middleware**: request tracing spans

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{catalog::CatalogStore, config::Config, library::Library};

pub mod handlers;
pub mod middleware;
pub mod responses;

pub use responses::{ApiResponse, handle_error, handle_result};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogStore,
    pub library: Library,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr = state.config.bind_address().parse()?;
        Ok(Self {
            app: Self::create_router(state),
            addr,
        })
    }

    pub fn create_router(state: AppState) -> Router {
        let fallback_route = state.config.player.fallback_route.clone();

        Router::new()
            .nest("/api", Self::api_routes())
            .route(&fallback_route, get(handlers::player::player_page))
            .layer(CorsLayer::permissive())
            .layer(middleware::http_trace_layer(&fallback_route))
            .with_state(state)
    }

    fn api_routes() -> Router<AppState> {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/stats", get(handlers::directory::stats))
            .route("/categories", get(handlers::directory::categories))
            .route("/countries", get(handlers::directory::countries))
            .route("/channels", get(handlers::directory::list_channels))
            .route("/channels/latest", get(handlers::directory::latest_channels))
            .route("/channels/{id}/playback", get(handlers::directory::playback))
            .route("/search", get(handlers::directory::search))
            .route("/favorites", get(handlers::library::list_favorites))
            .route(
                "/favorites/{id}",
                axum::routing::put(handlers::library::add_favorite)
                    .delete(handlers::library::remove_favorite),
            )
            .route(
                "/favorites/{id}/toggle",
                post(handlers::library::toggle_favorite),
            )
            .route("/recent", get(handlers::library::list_recent))
            .route("/recent/{id}", post(handlers::library::record_recent))
    }

    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Serve until `shutdown` is cancelled.
    pub async fn serve_with_cancellation(self, shutdown: CancellationToken) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;
        info!("Web server listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("Web server received cancellation signal, shutting down gracefully");
            })
            .await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}
