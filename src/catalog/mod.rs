//! In-memory channel catalog.
//!
//! [`Catalog`] is an immutable snapshot of the six upstream collections plus
//! a [`CatalogIndex`]. [`CatalogStore`] holds the current snapshot behind a
//! lock and swaps in a new one on refresh, so readers never see a half-built
//! catalog.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub mod client;
pub mod index;

pub use client::{CatalogClient, CatalogFetch};
pub use index::CatalogIndex;

use crate::models::{Category, Channel, Country, Language, Logo, Stream};

/// Raw collections as downloaded.
#[derive(Debug, Clone, Default)]
pub struct CatalogCollections {
    pub channels: Vec<Channel>,
    pub streams: Vec<Stream>,
    pub categories: Vec<Category>,
    pub countries: Vec<Country>,
    pub languages: Vec<Language>,
    pub logos: Vec<Logo>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    collections: CatalogCollections,
    index: CatalogIndex,
    loaded_at: DateTime<Utc>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogCollections::default())
    }
}

impl Catalog {
    pub fn new(collections: CatalogCollections) -> Self {
        let index = CatalogIndex::build(
            &collections.channels,
            &collections.streams,
            &collections.countries,
            &collections.logos,
        );
        Self {
            collections,
            index,
            loaded_at: Utc::now(),
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.collections.channels
    }

    pub fn streams(&self) -> &[Stream] {
        &self.collections.streams
    }

    pub fn categories(&self) -> &[Category] {
        &self.collections.categories
    }

    pub fn countries(&self) -> &[Country] {
        &self.collections.countries
    }

    pub fn languages(&self) -> &[Language] {
        &self.collections.languages
    }

    pub fn logos(&self) -> &[Logo] {
        &self.collections.logos
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn is_empty(&self) -> bool {
        self.collections.channels.is_empty()
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.index
            .channel(id)
            .and_then(|pos| self.collections.channels.get(pos))
    }

    /// URL of the first stream listed for the channel.
    pub fn stream_url(&self, channel_id: &str) -> Option<&str> {
        self.index
            .stream(channel_id)
            .and_then(|pos| self.collections.streams.get(pos))
            .map(|s| s.url.as_str())
    }

    /// URL of the first logo listed for the channel.
    pub fn logo_url(&self, channel_id: &str) -> Option<&str> {
        self.index
            .logo(channel_id)
            .and_then(|pos| self.collections.logos.get(pos))
            .map(|l| l.url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn country(&self, code: &str) -> Option<&Country> {
        self.index
            .country(code)
            .and_then(|pos| self.collections.countries.get(pos))
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }
}

/// Shared, refreshable catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    current: Arc<RwLock<Arc<Catalog>>>,
    client: Option<CatalogClient>,
}

impl CatalogStore {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(Catalog::default()))),
            client: Some(client),
        }
    }

    /// A store serving a fixed catalog; [`refresh`](Self::refresh) is a no-op.
    pub fn fixed(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
            client: None,
        }
    }

    pub async fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    /// Fetch a fresh catalog and swap it in. Returns the snapshot now served.
    ///
    /// Once a catalog with channels is loaded, a fetch that comes back without
    /// channels or with any failed collection is discarded and the previous
    /// snapshot stays.
    pub async fn refresh(&self) -> Arc<Catalog> {
        let Some(client) = &self.client else {
            debug!(target = "catalog.store", "fixed catalog, refresh skipped");
            return self.snapshot().await;
        };

        let fetch = client.fetch_all().await;
        let mut current = self.current.write().await;
        if !current.is_empty() && (fetch.catalog.is_empty() || !fetch.is_complete()) {
            warn!(
                target = "catalog.store",
                failed = ?fetch.failed,
                fetched_channels = fetch.catalog.channels().len(),
                kept_channels = current.channels().len(),
                "catalog refresh incomplete, keeping previous snapshot"
            );
            return current.clone();
        }

        let fresh = Arc::new(fetch.catalog);
        *current = fresh.clone();
        fresh
    }

    /// Refresh every `interval` until `shutdown` fires.
    pub fn spawn_refresh(&self, interval: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the initial load already happened.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!(target = "catalog.store", "catalog refresh task stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let catalog = store.refresh().await;
                        info!(
                            target = "catalog.store",
                            channels = catalog.channels().len(),
                            "catalog refreshed"
                        );
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(CatalogCollections {
            channels: vec![Channel {
                id: "a.us".into(),
                name: "A".into(),
                country: "US".into(),
                ..Default::default()
            }],
            streams: vec![Stream {
                channel: Some("a.us".into()),
                url: "https://cdn/a.m3u8".into(),
                ..Default::default()
            }],
            countries: vec![Country {
                code: "US".into(),
                name: "United States".into(),
                flag: "🇺🇸".into(),
                ..Default::default()
            }],
            logos: vec![Logo {
                channel: Some("a.us".into()),
                url: String::new(),
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    #[test]
    fn lookups_resolve_through_the_index() {
        let catalog = sample();
        assert_eq!(catalog.channel("a.us").map(|c| c.name.as_str()), Some("A"));
        assert_eq!(catalog.stream_url("a.us"), Some("https://cdn/a.m3u8"));
        assert_eq!(catalog.country("US").map(|c| c.name.as_str()), Some("United States"));
        // An empty logo url counts as no logo
        assert_eq!(catalog.logo_url("a.us"), None);
        assert!(catalog.channel("missing").is_none());
    }

    #[tokio::test]
    async fn fixed_store_ignores_refresh() {
        let store = CatalogStore::fixed(sample());
        let refreshed = store.refresh().await;
        assert_eq!(refreshed.channels().len(), 1);
        assert_eq!(store.snapshot().await.channels().len(), 1);
    }
}
