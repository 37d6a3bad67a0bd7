//! Same-origin page used as the embedded playback fallback.

use askama::Template;
use axum::{
    extract::Query,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::errors::{AppError, WebError};
use crate::streaming::{FormatHint, classify};
use crate::web::responses::handle_error;

#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    pub src: Option<String>,
}

#[derive(Template)]
#[template(path = "player.html")]
pub struct PlayerPage {
    pub src: String,
    pub mime: String,
    pub use_hls: bool,
}

/// Only absolute http(s) URLs are accepted.
fn validate_source(src: Option<&str>) -> Result<Url, WebError> {
    let src = src
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| WebError::invalid_request("src", "missing stream url"))?;
    let url = Url::parse(src).map_err(|e| WebError::invalid_request("src", e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(WebError::invalid_request(
            "src",
            format!("unsupported scheme '{other}'"),
        )),
    }
}

pub fn render_player_page(src: &Url) -> Result<String, WebError> {
    let stream = classify(src.as_str());
    let page = PlayerPage {
        src: stream.url.clone(),
        mime: stream.mime.to_string(),
        use_hls: stream.hint == FormatHint::Hls,
    };
    Ok(page.render()?)
}

pub async fn player_page(Query(query): Query<PlayerQuery>) -> Response {
    let result = validate_source(query.src.as_deref()).and_then(|url| {
        debug!(target = "web.player", src = %url, "rendering fallback player");
        render_player_page(&url)
    });

    match result {
        Ok(html) => Html(html).into_response(),
        Err(e) => handle_error(AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_and_non_http_sources() {
        assert!(validate_source(None).is_err());
        assert!(validate_source(Some("  ")).is_err());
        assert!(validate_source(Some("javascript:alert(1)")).is_err());
        assert!(validate_source(Some("ftp://host/a.mp4")).is_err());
        assert!(validate_source(Some("https://host/a.m3u8")).is_ok());
    }

    #[test]
    fn page_escapes_source() {
        let url = Url::parse("https://host/live.m3u8?a=1&b=\"x\"").unwrap();
        let html = render_player_page(&url).unwrap();
        assert!(html.contains("hls.js"));
        assert!(!html.contains("b=\"x\""));
        assert!(html.contains("&amp;"));
    }
}
