//! Projections served to the front end.

use serde::Serialize;

use crate::streaming::StreamReference;

/// A count together with its compact label (`"12.3K+"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCount {
    pub value: usize,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Listed channels only (not adult, not closed)
    pub channels: StatCount,
    /// Distinct country codes across all channels
    pub countries: StatCount,
    pub categories: StatCount,
    pub languages: StatCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTile {
    pub id: String,
    pub name: String,
    pub channel_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryTile {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub channel_count: usize,
}

/// A playable (or not) channel as shown in grids and the player header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelCard {
    pub id: String,
    pub name: String,
    pub country_code: String,
    pub country_name: Option<String>,
    pub country_flag: Option<String>,
    pub category: String,
    pub logo_url: String,
    pub stream_url: Option<String>,
    /// `"<country> • <Category>"`
    pub display_meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub country_name: Option<String>,
    pub country_flag: Option<String>,
    pub thumbnail_url: String,
    pub stream_url: Option<String>,
    pub has_stream: bool,
}

/// Everything a front end needs to call `open` for a channel.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackDescriptor {
    pub channel_id: String,
    pub display_name: String,
    pub display_meta: String,
    pub logo_url: String,
    pub stream: StreamReference,
    /// Same-origin embedded fallback page for this stream
    pub fallback_url: String,
}
