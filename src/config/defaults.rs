/// Configuration default values
///
/// All default values for configuration options live here so they can be
/// changed in one place.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Catalog defaults
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://iptv-org.github.io/api";
pub const DEFAULT_CATALOG_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_CATALOG_USER_AGENT: &str = concat!("channel-player/", env!("CARGO_PKG_VERSION"));

// Player defaults
pub const DEFAULT_FALLBACK_TIMEOUT: &str = "5s";
pub const DEFAULT_FALLBACK_ROUTE: &str = "/player";

// Library defaults
pub const DEFAULT_LIBRARY_PATH: &str = "./data/library.json";
pub const DEFAULT_RECENT_LIMIT: usize = 20;

// Directory projections
pub const DEFAULT_CATEGORY_TILES: usize = 8;
pub const DEFAULT_COUNTRY_TILES: usize = 12;
pub const DEFAULT_LATEST_CHANNELS: usize = 10;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_CHANNEL_PAGE_LIMIT: usize = 60;
