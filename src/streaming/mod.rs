//! Stream URL inspection shared by the playback controller and the web layer.

pub mod classification;

pub use classification::{FormatHint, StreamReference, classify, fallback_proxy_url};
