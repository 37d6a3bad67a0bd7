use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::player::AdaptiveEngineConfig;
use defaults::*;

/// Prefix for environment overrides, e.g. `CHANNEL_PLAYER_WEB__PORT=9000`.
pub const ENV_PREFIX: &str = "CHANNEL_PLAYER_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where and how the public channel catalog is fetched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Base URL holding `channels.json`, `streams.json` and friends
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    #[serde(
        default = "default_catalog_request_timeout",
        with = "duration_serde::duration"
    )]
    pub request_timeout: Duration,
    #[serde(default = "default_catalog_user_agent")]
    pub user_agent: String,
    /// Reload the catalog in the background at this interval; unset disables it
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_interval: Option<Duration>,
}

/// Playback controller settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    /// How long the embedded fallback frame has to report a load
    #[serde(
        default = "default_fallback_timeout",
        with = "duration_serde::duration"
    )]
    pub fallback_timeout: Duration,
    /// Same-origin route serving the fallback player page
    #[serde(default = "default_fallback_route")]
    pub fallback_route: String,
    #[serde(default)]
    pub adaptive: AdaptiveEngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryConfig {
    /// JSON file backing favorites and recently watched
    #[serde(default = "default_library_path")]
    pub path: PathBuf,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

/// Sizes of the curated directory projections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryConfig {
    #[serde(default = "default_category_tiles")]
    pub category_tiles: usize,
    #[serde(default = "default_country_tiles")]
    pub country_tiles: usize,
    #[serde(default = "default_latest_channels")]
    pub latest_channels: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "default_channel_page_limit")]
    pub channel_page_limit: usize,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_catalog_base_url() -> String {
    DEFAULT_CATALOG_BASE_URL.to_string()
}

fn default_catalog_request_timeout() -> Duration {
    parse_default_duration(DEFAULT_CATALOG_REQUEST_TIMEOUT, 30)
}

fn default_catalog_user_agent() -> String {
    DEFAULT_CATALOG_USER_AGENT.to_string()
}

fn default_fallback_timeout() -> Duration {
    parse_default_duration(DEFAULT_FALLBACK_TIMEOUT, 5)
}

fn default_fallback_route() -> String {
    DEFAULT_FALLBACK_ROUTE.to_string()
}

fn default_library_path() -> PathBuf {
    PathBuf::from(DEFAULT_LIBRARY_PATH)
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_category_tiles() -> usize {
    DEFAULT_CATEGORY_TILES
}

fn default_country_tiles() -> usize {
    DEFAULT_COUNTRY_TILES
}

fn default_latest_channels() -> usize {
    DEFAULT_LATEST_CHANNELS
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_channel_page_limit() -> usize {
    DEFAULT_CHANNEL_PAGE_LIMIT
}

fn parse_default_duration(value: &str, fallback_secs: u64) -> Duration {
    humantime::parse_duration(value).unwrap_or(Duration::from_secs(fallback_secs))
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            request_timeout: default_catalog_request_timeout(),
            user_agent: default_catalog_user_agent(),
            refresh_interval: None,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fallback_timeout: default_fallback_timeout(),
            fallback_route: default_fallback_route(),
            adaptive: AdaptiveEngineConfig::default(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            category_tiles: default_category_tiles(),
            country_tiles: default_country_tiles(),
            latest_channels: default_latest_channels(),
            search_limit: default_search_limit(),
            channel_page_limit: default_channel_page_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            catalog: CatalogConfig::default(),
            player: PlayerConfig::default(),
            library: LibraryConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `CHANNEL_PLAYER_*` variables.
    ///
    /// A missing file is created with the defaults first.
    pub fn load_from_file(config_file: impl AsRef<Path>) -> Result<Self> {
        let config_file = config_file.as_ref();
        if !config_file.exists() {
            if let Some(parent) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file.display());
        }

        let config: Self = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.library.recent_limit == 0 {
            anyhow::bail!("library.recent_limit must be at least 1");
        }
        if !self.player.fallback_route.starts_with('/') {
            anyhow::bail!(
                "player.fallback_route must be an absolute path, got '{}'",
                self.player.fallback_route
            );
        }
        url::Url::parse(&self.catalog.base_url).map_err(|e| {
            anyhow::anyhow!("catalog.base_url '{}' is invalid: {e}", self.catalog.base_url)
        })?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.web.host, self.web.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.player.fallback_timeout, Duration::from_secs(5));
        assert_eq!(config.player.fallback_route, "/player");
        assert!(config.player.adaptive.enable_worker);
        assert!(config.player.adaptive.low_latency_mode);
        assert_eq!(config.library.recent_limit, 20);
        assert_eq!(config.catalog.base_url, "https://iptv-org.github.io/api");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.web.port, DEFAULT_PORT);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("fallback_timeout = \"5s\""));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[web]
port = 9090

[player]
fallback_timeout = "8s"

[catalog]
refresh_interval = "6h"

[library]
recent_limit = 5
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.web.port, 9090);
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.player.fallback_timeout, Duration::from_secs(8));
        assert_eq!(config.player.fallback_route, "/player");
        assert_eq!(
            config.catalog.refresh_interval,
            Some(Duration::from_secs(6 * 3600))
        );
        assert_eq!(config.library.recent_limit, 5);
    }

    #[test]
    fn validation_rejects_relative_fallback_route() {
        let mut config = Config::default();
        config.player.fallback_route = "player".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.library.recent_limit = 0;
        assert!(config.validate().is_err());
    }
}
