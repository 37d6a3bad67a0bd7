//! Lookup tables built once per catalog load.

use std::collections::HashMap;

use crate::models::{Channel, Country, Logo, Stream};

/// Positions into the catalog vectors, keyed by id.
///
/// Streams and logos are many-to-one with channels; the first entry listed
/// for a channel wins and later ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    channels: HashMap<String, usize>,
    first_stream: HashMap<String, usize>,
    first_logo: HashMap<String, usize>,
    countries: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn build(channels: &[Channel], streams: &[Stream], countries: &[Country], logos: &[Logo]) -> Self {
        let mut index = Self::default();

        for (pos, channel) in channels.iter().enumerate() {
            index.channels.entry(channel.id.clone()).or_insert(pos);
        }
        for (pos, stream) in streams.iter().enumerate() {
            if let Some(channel) = stream.channel.as_deref().filter(|c| !c.is_empty()) {
                index.first_stream.entry(channel.to_string()).or_insert(pos);
            }
        }
        for (pos, logo) in logos.iter().enumerate() {
            if let Some(channel) = logo.channel.as_deref().filter(|c| !c.is_empty()) {
                index.first_logo.entry(channel.to_string()).or_insert(pos);
            }
        }
        for (pos, country) in countries.iter().enumerate() {
            index.countries.entry(country.code.clone()).or_insert(pos);
        }

        index
    }

    pub fn channel(&self, id: &str) -> Option<usize> {
        self.channels.get(id).copied()
    }

    pub fn stream(&self, channel_id: &str) -> Option<usize> {
        self.first_stream.get(channel_id).copied()
    }

    pub fn logo(&self, channel_id: &str) -> Option<usize> {
        self.first_logo.get(channel_id).copied()
    }

    pub fn country(&self, code: &str) -> Option<usize> {
        self.countries.get(code).copied()
    }

    pub fn playable_channels(&self) -> usize {
        self.first_stream.len()
    }
}
