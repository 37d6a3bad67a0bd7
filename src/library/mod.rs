//! Favorites and recently watched channels.
//!
//! Both lists are JSON arrays of channel ids stored under fixed keys.
//! Favorites keep insertion order without duplicates. Recently watched is
//! most-recent-first, de-duplicated on insert and capped. Data that cannot be
//! read as a list of strings is treated as an empty list.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use crate::errors::LibraryResult;

pub const FAVORITES_KEY: &str = "favorites";
pub const RECENT_KEY: &str = "recently_watched";

#[derive(Clone)]
pub struct Library {
    store: Arc<dyn KeyValueStore>,
    recent_limit: usize,
    update_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("recent_limit", &self.recent_limit)
            .finish_non_exhaustive()
    }
}

impl Library {
    pub fn new(store: Arc<dyn KeyValueStore>, recent_limit: usize) -> Self {
        Self {
            store,
            recent_limit: recent_limit.max(1),
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory(recent_limit: usize) -> Self {
        Self::new(Arc::new(MemoryStore::new()), recent_limit)
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    async fn read_ids(&self, key: &str) -> LibraryResult<Vec<String>> {
        let Some(value) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_value::<Vec<String>>(value) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(target = "library", key, error = %e, "stored list unreadable, using empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn write_ids(&self, key: &str, ids: &[String]) -> LibraryResult<()> {
        self.store.set(key, Value::from(ids.to_vec())).await
    }

    pub async fn favorites(&self) -> LibraryResult<Vec<String>> {
        self.read_ids(FAVORITES_KEY).await
    }

    pub async fn is_favorite(&self, channel_id: &str) -> LibraryResult<bool> {
        Ok(self.favorites().await?.iter().any(|id| id == channel_id))
    }

    pub async fn add_favorite(&self, channel_id: &str) -> LibraryResult<Vec<String>> {
        let _guard = self.update_lock.lock().await;
        let mut favorites = self.favorites().await?;
        if !favorites.iter().any(|id| id == channel_id) {
            favorites.push(channel_id.to_string());
            self.write_ids(FAVORITES_KEY, &favorites).await?;
            debug!(target = "library", channel = channel_id, "favorite added");
        }
        Ok(favorites)
    }

    pub async fn remove_favorite(&self, channel_id: &str) -> LibraryResult<Vec<String>> {
        let _guard = self.update_lock.lock().await;
        let mut favorites = self.favorites().await?;
        let before = favorites.len();
        favorites.retain(|id| id != channel_id);
        if favorites.len() != before {
            self.write_ids(FAVORITES_KEY, &favorites).await?;
            debug!(target = "library", channel = channel_id, "favorite removed");
        }
        Ok(favorites)
    }

    /// Flip membership. Returns whether the channel is a favorite afterwards.
    pub async fn toggle_favorite(&self, channel_id: &str) -> LibraryResult<(bool, Vec<String>)> {
        let _guard = self.update_lock.lock().await;
        let mut favorites = self.favorites().await?;
        let now_favorite = match favorites.iter().position(|id| id == channel_id) {
            Some(pos) => {
                favorites.remove(pos);
                false
            }
            None => {
                favorites.push(channel_id.to_string());
                true
            }
        };
        self.write_ids(FAVORITES_KEY, &favorites).await?;
        debug!(target = "library", channel = channel_id, now_favorite, "favorite toggled");
        Ok((now_favorite, favorites))
    }

    pub async fn recently_watched(&self) -> LibraryResult<Vec<String>> {
        self.read_ids(RECENT_KEY).await
    }

    /// Move `channel_id` to the front, dropping the oldest past the cap.
    pub async fn record_watched(&self, channel_id: &str) -> LibraryResult<Vec<String>> {
        let _guard = self.update_lock.lock().await;
        let mut recent = self.recently_watched().await?;
        recent.retain(|id| id != channel_id);
        recent.insert(0, channel_id.to_string());
        recent.truncate(self.recent_limit);
        self.write_ids(RECENT_KEY, &recent).await?;
        Ok(recent)
    }
}
