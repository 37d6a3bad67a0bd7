//! Catalog entities as published by the public channel API.
//!
//! Every collection is a JSON array of flat objects. Fields the upstream may
//! omit or set to `null` deserialize to their defaults so a partially filled
//! record never fails the whole collection.

use serde::{Deserialize, Deserializer, Serialize};

pub mod views;

pub use views::*;

/// Category id used when a channel lists none.
pub const DEFAULT_CATEGORY: &str = "general";

/// Category excluded from the curated tiles.
pub const ADULT_CATEGORY: &str = "xxx";

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alt_names: Vec<String>,
    pub network: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub owners: Vec<String>,
    /// ISO 3166-1 alpha-2 code
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    pub subdivision: Option<String>,
    pub city: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_nsfw: bool,
    pub launched: Option<String>,
    pub closed: Option<String>,
    pub replaced_by: Option<String>,
    pub website: Option<String>,
}

impl Channel {
    /// Shown in listings: not adult content and not shut down.
    pub fn is_listed(&self) -> bool {
        !self.is_nsfw && self.closed.is_none()
    }

    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Case-insensitive substring match against the name and alternate names.
    /// `needle` must already be lowercase.
    pub fn matches_name(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .alt_names
                .iter()
                .any(|alt| alt.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    /// Owning channel id; some streams are not attributed to any channel
    pub channel: Option<String>,
    pub feed: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Country {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    /// Flag emoji
    #[serde(deserialize_with = "null_as_default")]
    pub flag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logo {
    pub channel: Option<String>,
    pub feed: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_channel_record_deserializes() {
        let json = r#"{"id":"a.us","name":"A","country":"US","categories":null,"closed":null}"#;
        let channel: Channel = serde_json::from_str(json).unwrap();
        assert_eq!(channel.id, "a.us");
        assert!(channel.is_listed());
        assert_eq!(channel.primary_category(), DEFAULT_CATEGORY);
    }

    #[test]
    fn closed_or_nsfw_channels_are_not_listed() {
        let closed = Channel {
            closed: Some("2020-01-01".into()),
            ..Default::default()
        };
        let nsfw = Channel {
            is_nsfw: true,
            ..Default::default()
        };
        assert!(!closed.is_listed());
        assert!(!nsfw.is_listed());
    }

    #[test]
    fn name_match_checks_alternate_names() {
        let channel = Channel {
            name: "Deutsche Welle".into(),
            alt_names: vec!["DW English".into()],
            ..Default::default()
        };
        assert!(channel.matches_name("welle"));
        assert!(channel.matches_name("dw eng"));
        assert!(!channel.matches_name("bbc"));
    }
}
