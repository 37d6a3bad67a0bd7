//! HTTP client for the public channel catalog.
//!
//! Six JSON collections are fetched concurrently. A collection that fails to
//! download or decode is logged and replaced by an empty list so the rest of
//! the catalog stays usable.

use futures::join;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::{Catalog, CatalogCollections};
use crate::config::CatalogConfig;
use crate::errors::{CatalogError, CatalogResult};
use crate::models::{Category, Channel, Country, Language, Logo, Stream};

pub const CHANNELS: &str = "channels";
pub const STREAMS: &str = "streams";
pub const CATEGORIES: &str = "categories";
pub const COUNTRIES: &str = "countries";
pub const LANGUAGES: &str = "languages";
pub const LOGOS: &str = "logos";

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base: Url,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{name}.json`
    pub fn collection_url(&self, name: &str) -> CatalogResult<Url> {
        Ok(self.base.join(&format!("{name}.json"))?)
    }

    pub async fn fetch_collection<T: DeserializeOwned>(&self, name: &str) -> CatalogResult<Vec<T>> {
        let url = self.collection_url(name)?;
        debug!(target = "catalog.fetch", collection = name, %url, "fetching collection");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::request(name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                collection: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::request(name, e))?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::decode(name, e.to_string()))
    }

    /// Download all six collections concurrently.
    ///
    /// A collection that fails is logged, replaced by an empty list and named
    /// in [`CatalogFetch::failed`].
    pub async fn fetch_all(&self) -> CatalogFetch {
        let (channels, streams, categories, countries, languages, logos) = join!(
            self.fetch_collection::<Channel>(CHANNELS),
            self.fetch_collection::<Stream>(STREAMS),
            self.fetch_collection::<Category>(CATEGORIES),
            self.fetch_collection::<Country>(COUNTRIES),
            self.fetch_collection::<Language>(LANGUAGES),
            self.fetch_collection::<Logo>(LOGOS),
        );

        let mut failed = Vec::new();
        let catalog = Catalog::new(CatalogCollections {
            channels: or_empty(CHANNELS, channels, &mut failed),
            streams: or_empty(STREAMS, streams, &mut failed),
            categories: or_empty(CATEGORIES, categories, &mut failed),
            countries: or_empty(COUNTRIES, countries, &mut failed),
            languages: or_empty(LANGUAGES, languages, &mut failed),
            logos: or_empty(LOGOS, logos, &mut failed),
        });

        info!(
            target = "catalog.fetch",
            base = %self.base,
            channels = catalog.channels().len(),
            streams = catalog.streams().len(),
            logos = catalog.logos().len(),
            failed = ?failed,
            "catalog loaded"
        );
        CatalogFetch { catalog, failed }
    }
}

/// Result of [`CatalogClient::fetch_all`].
#[derive(Debug)]
pub struct CatalogFetch {
    pub catalog: Catalog,
    /// Collections that could not be downloaded or decoded
    pub failed: Vec<&'static str>,
}

impl CatalogFetch {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn or_empty<T>(
    name: &'static str,
    result: CatalogResult<Vec<T>>,
    failed: &mut Vec<&'static str>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(target = "catalog.fetch", collection = name, error = %e, "collection unavailable, using empty list");
            failed.push(name);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_urls_keep_base_path() {
        let config = CatalogConfig {
            base_url: "https://iptv-org.github.io/api".into(),
            ..CatalogConfig::default()
        };
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(
            client.collection_url(CHANNELS).unwrap().as_str(),
            "https://iptv-org.github.io/api/channels.json"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        let config = CatalogConfig {
            base_url: "not a url".into(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            CatalogClient::new(&config),
            Err(CatalogError::InvalidUrl(_))
        ));
    }
}
