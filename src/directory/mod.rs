//! Curated projections over a loaded [`Catalog`].
//!
//! Everything here is a pure function of the catalog snapshot. Only listed
//! channels (not adult content, not closed) appear in tiles, cards and search
//! results.

use std::collections::{HashMap, HashSet};
use tracing::trace;

pub mod format;

pub use format::{capitalize_first, display_meta, format_count, placeholder_image, placeholder_logo};

use crate::catalog::Catalog;
use crate::models::{
    ADULT_CATEGORY, CatalogStats, CategoryTile, Channel, ChannelCard, CountryTile,
    PlaybackDescriptor, SearchHit, StatCount,
};
use crate::streaming::{classify, fallback_proxy_url};

/// Queries shorter than this (in characters) return no hits.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Filter for [`channels`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    pub category: Option<String>,
    /// Country code, compared case-insensitively
    pub country: Option<String>,
    pub limit: usize,
}

fn stat(value: usize) -> StatCount {
    StatCount {
        value,
        display: format_count(value),
    }
}

pub fn stats(catalog: &Catalog) -> CatalogStats {
    let listed = catalog.channels().iter().filter(|c| c.is_listed()).count();
    let countries: HashSet<&str> = catalog
        .channels()
        .iter()
        .map(|c| c.country.as_str())
        .collect();

    CatalogStats {
        channels: stat(listed),
        countries: stat(countries.len()),
        categories: stat(catalog.categories().len()),
        languages: stat(catalog.languages().len()),
    }
}

/// First `limit` categories in catalog order, adult category excluded,
/// each with its listed-channel count.
pub fn category_tiles(catalog: &Catalog, limit: usize) -> Vec<CategoryTile> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for channel in catalog.channels().iter().filter(|c| c.is_listed()) {
        for category in &channel.categories {
            *counts.entry(category.as_str()).or_default() += 1;
        }
    }

    catalog
        .categories()
        .iter()
        .filter(|category| category.id != ADULT_CATEGORY)
        .take(limit)
        .map(|category| CategoryTile {
            id: category.id.clone(),
            name: category.name.clone(),
            channel_count: counts.get(category.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Countries with at least one listed channel, busiest first, top `limit`.
pub fn country_tiles(catalog: &Catalog, limit: usize) -> Vec<CountryTile> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for channel in catalog.channels().iter().filter(|c| c.is_listed()) {
        if !channel.country.is_empty() {
            *counts.entry(channel.country.as_str()).or_default() += 1;
        }
    }

    let mut tiles: Vec<CountryTile> = catalog
        .countries()
        .iter()
        .filter_map(|country| {
            let channel_count = counts.get(country.code.as_str()).copied()?;
            Some(CountryTile {
                code: country.code.clone(),
                name: country.name.clone(),
                flag: country.flag.clone(),
                channel_count,
            })
        })
        .collect();

    // Stable sort keeps catalog order among equal counts
    tiles.sort_by(|a, b| b.channel_count.cmp(&a.channel_count));
    tiles.truncate(limit);
    tiles
}

pub fn channel_card(catalog: &Catalog, channel: &Channel) -> ChannelCard {
    let country = catalog.country(&channel.country);
    let category = channel.primary_category().to_string();
    let country_name = country.map(|c| c.name.clone());

    ChannelCard {
        id: channel.id.clone(),
        name: channel.name.clone(),
        country_code: channel.country.clone(),
        display_meta: display_meta(country_name.as_deref().unwrap_or(""), &category),
        country_name,
        country_flag: country.map(|c| c.flag.clone()),
        category,
        logo_url: catalog
            .logo_url(&channel.id)
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_logo(&channel.name)),
        stream_url: catalog.stream_url(&channel.id).map(str::to_string),
    }
}

/// First `limit` listed channels that have a stream, in catalog order.
pub fn latest_channels(catalog: &Catalog, limit: usize) -> Vec<ChannelCard> {
    catalog
        .channels()
        .iter()
        .filter(|c| c.is_listed() && catalog.stream_url(&c.id).is_some())
        .take(limit)
        .map(|c| channel_card(catalog, c))
        .collect()
}

pub fn channels(catalog: &Catalog, filter: &ChannelFilter) -> Vec<ChannelCard> {
    catalog
        .channels()
        .iter()
        .filter(|c| c.is_listed())
        .filter(|c| {
            filter
                .category
                .as_deref()
                .is_none_or(|wanted| c.categories.iter().any(|cat| cat == wanted))
        })
        .filter(|c| {
            filter
                .country
                .as_deref()
                .is_none_or(|wanted| c.country.eq_ignore_ascii_case(wanted))
        })
        .take(filter.limit)
        .map(|c| channel_card(catalog, c))
        .collect()
}

/// Case-insensitive substring search over names and alternate names.
pub fn search(catalog: &Catalog, query: &str, limit: usize) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_SEARCH_CHARS {
        trace!(target = "directory.search", query, "query too short");
        return Vec::new();
    }

    catalog
        .channels()
        .iter()
        .filter(|c| c.is_listed() && c.matches_name(&needle))
        .take(limit)
        .map(|channel| {
            let country = catalog.country(&channel.country);
            let stream_url = catalog.stream_url(&channel.id).map(str::to_string);
            SearchHit {
                id: channel.id.clone(),
                name: channel.name.clone(),
                country_name: country.map(|c| c.name.clone()),
                country_flag: country.map(|c| c.flag.clone()),
                thumbnail_url: placeholder_image(48, 48, &channel.name, 2),
                has_stream: stream_url.is_some(),
                stream_url,
            }
        })
        .collect()
}

/// What a player needs to open `channel_id`; `None` when the channel is
/// unknown or has no stream.
pub fn playback_descriptor(
    catalog: &Catalog,
    channel_id: &str,
    fallback_route: &str,
) -> Option<PlaybackDescriptor> {
    let channel = catalog.channel(channel_id)?;
    let raw_url = catalog.stream_url(channel_id)?;
    let card = channel_card(catalog, channel);
    let stream = classify(raw_url);

    Some(PlaybackDescriptor {
        channel_id: card.id,
        display_name: card.name,
        display_meta: card.display_meta,
        logo_url: card.logo_url,
        fallback_url: fallback_proxy_url(fallback_route, &stream.url),
        stream,
    })
}
