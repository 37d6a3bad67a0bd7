use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use channel_player::{
    catalog::{CatalogClient, CatalogStore},
    config::Config,
    library::{JsonFileStore, Library},
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "channel-player")]
#[command(version)]
#[command(about = "A live channel directory with an adaptive stream playback controller")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Catalog base URL (overrides config file)
    #[arg(long, value_name = "URL")]
    catalog_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Received Ctrl+C, shutting down gracefully");
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("channel_player={},tower_http=trace", cli.log_level)
    } else {
        format!("channel_player={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting channel player v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(catalog_url) = cli.catalog_url {
        config.catalog.base_url = catalog_url;
    }
    config.validate()?;

    let client = CatalogClient::new(&config.catalog)?;
    let catalog = CatalogStore::new(client);
    let loaded = catalog.refresh().await;
    if loaded.is_empty() {
        warn!("Catalog has no channels; serving an empty directory until the next refresh");
    }

    let library = Library::new(
        Arc::new(JsonFileStore::new(config.library.path.clone())),
        config.library.recent_limit,
    );
    info!("Library stored at: {}", config.library.path.display());

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let refresh_task = config
        .catalog
        .refresh_interval
        .map(|interval| catalog.spawn_refresh(interval, shutdown.clone()));

    let server = WebServer::new(AppState {
        config: Arc::new(config),
        catalog,
        library,
    })?;
    info!("Serving on {}:{}", server.host(), server.port());
    server.serve_with_cancellation(shutdown.clone()).await?;

    shutdown.cancel();
    if let Some(task) = refresh_task {
        let _ = task.await;
    }
    info!("Shutdown complete");
    Ok(())
}
