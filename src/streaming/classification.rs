/*!
 * Stream Classification Module
 * ============================
 *
 * Purpose:
 *   Decide, from the shape of a stream URL alone, which playback strategy a player should
 *   start with:
 *
 * ```text
 *     - Hls          (path ends with `.m3u8`)
 *     - Dash         (path ends with `.mpd`)
 *     - Progressive  (anything else, including an empty URL)
 * ```
 *
 * Rules:
 *   1. Only the URL *path* is inspected; query string and fragment are ignored.
 *   2. Suffix matching is ASCII case-insensitive, first match wins.
 *   3. No network probing and no content-type sniffing. Classification is O(1).
 *
 * Normalization side effects:
 *   - `http:` URLs are upgraded to `https:` before use.
 *   - Percent-encoded URLs are decoded for logging/display only. The engine always receives
 *     the (upgraded) original form.
 *
 * Public API Surface:
 *   - classify()
 *   - StreamReference
 *   - FormatHint
 *   - fallback_proxy_url()
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// MIME type used for native HLS capability checks and as the progressive last resort.
pub const HLS_NATIVE_MIME: &str = "application/vnd.apple.mpegurl";

/// MIME type assumed for a `<source>` element when nothing better is known.
pub const GENERIC_PLAYLIST_MIME: &str = "application/x-mpegurl";

/// MIME type for progressive MP4 files.
pub const MP4_MIME: &str = "video/mp4";

const HLS_SUFFIX: &str = ".m3u8";
const DASH_SUFFIX: &str = ".mpd";
const MP4_SUFFIX: &str = ".mp4";

/// Transport declared by a stream URL's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    Hls,
    Dash,
    Progressive,
    /// Never produced by [`classify`]; planned like `Progressive`.
    Unknown,
}

impl FormatHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatHint::Hls => "hls",
            FormatHint::Dash => "dash",
            FormatHint::Progressive => "progressive",
            FormatHint::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FormatHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified stream URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamReference {
    /// URL handed to playback engines (transport upgraded, encoding untouched).
    pub url: String,
    /// Percent-decoded form, for logs and display only.
    pub display_url: String,
    pub hint: FormatHint,
    /// Best-guess MIME type for a native `<source>` element.
    pub mime: &'static str,
}

impl StreamReference {
    pub fn is_empty(&self) -> bool {
        self.url.trim().is_empty()
    }
}

/// Classify a stream URL. Never fails; unrecognised shapes are `Progressive`.
pub fn classify(raw_url: &str) -> StreamReference {
    let url = upgrade_transport(raw_url.trim());
    let path = strip_query_and_fragment(&url).to_ascii_lowercase();

    let hint = if path.ends_with(HLS_SUFFIX) {
        FormatHint::Hls
    } else if path.ends_with(DASH_SUFFIX) {
        FormatHint::Dash
    } else {
        FormatHint::Progressive
    };

    let mime = match hint {
        FormatHint::Hls => HLS_NATIVE_MIME,
        FormatHint::Dash => "application/dash+xml",
        FormatHint::Progressive | FormatHint::Unknown => guess_progressive_mime(&path),
    };

    let display_url = display_form(&url);
    debug!(
        target = "stream.classify",
        url = %display_url,
        hint = %hint,
        mime,
        "classification complete"
    );

    StreamReference {
        url,
        display_url,
        hint,
        mime,
    }
}

/// MIME guess for the progressive strategy: MP4 by suffix, otherwise the generic playlist type.
pub fn guess_progressive_mime(path: &str) -> &'static str {
    if strip_query_and_fragment(path)
        .to_ascii_lowercase()
        .ends_with(MP4_SUFFIX)
    {
        MP4_MIME
    } else {
        GENERIC_PLAYLIST_MIME
    }
}

/// Build the same-origin fallback route carrying the original URL as `src`.
pub fn fallback_proxy_url(route: &str, stream_url: &str) -> String {
    format!("{route}?src={}", urlencoding::encode(stream_url))
}

/* -----------------------------
 * Normalization Helpers
 * --------------------------- */

fn upgrade_transport(url: &str) -> String {
    match url.get(..5) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http:") => format!("https:{}", &url[5..]),
        _ => url.to_string(),
    }
}

fn display_form(url: &str) -> String {
    // Malformed UTF-8 after decoding: show the raw form.
    urlencoding::decode(url)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| url.to_string())
}

fn strip_query_and_fragment(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(pos) => &url[..pos],
        None => url,
    }
}
