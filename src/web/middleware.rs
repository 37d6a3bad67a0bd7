//! HTTP request tracing.
//!
//! Every request gets a span carrying a request id and the area of the app it
//! hit. Requests for the fallback player page also record the transport the
//! requested stream classifies as, so fallback traffic can be told apart per
//! format in the logs.

use axum::http::{Request, Response};
use std::sync::Arc;
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::{Span, field, info, info_span, warn};
use uuid::Uuid;

use crate::streaming::{FormatHint, classify};

pub type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, DefaultOnRequest, ResponseLog>;

pub fn http_trace_layer(fallback_route: &str) -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan::new(fallback_route))
        .on_response(ResponseLog)
}

/// Part of the router a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestArea {
    Api,
    FallbackPlayer,
    Other,
}

impl RequestArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestArea::Api => "api",
            RequestArea::FallbackPlayer => "fallback-player",
            RequestArea::Other => "other",
        }
    }
}

/// Area of `path`, plus the stream hint when it is a fallback player request
/// with a `src` parameter.
pub fn request_area(
    path: &str,
    query: Option<&str>,
    fallback_route: &str,
) -> (RequestArea, Option<FormatHint>) {
    if path == fallback_route {
        let hint = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "src")
                .map(|(_, src)| classify(&src).hint)
        });
        return (RequestArea::FallbackPlayer, hint);
    }
    if path == "/api" || path.starts_with("/api/") {
        return (RequestArea::Api, None);
    }
    (RequestArea::Other, None)
}

#[derive(Debug, Clone)]
pub struct RequestSpan {
    fallback_route: Arc<str>,
}

impl RequestSpan {
    pub fn new(fallback_route: &str) -> Self {
        Self {
            fallback_route: Arc::from(fallback_route),
        }
    }
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let uri = request.uri();
        let (area, hint) = request_area(uri.path(), uri.query(), &self.fallback_route);

        let span = info_span!(
            "request",
            method = %request.method(),
            path = uri.path(),
            area = area.as_str(),
            request_id = %Uuid::new_v4(),
            stream_hint = field::Empty,
        );
        if let Some(hint) = hint {
            span.record("stream_hint", hint.as_str());
        }
        span
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLog;

impl<B> OnResponse<B> for ResponseLog {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status().as_u16();
        let latency_ms = latency.as_millis() as u64;
        if status >= 400 {
            warn!(status, latency_ms, "request completed with error");
        } else {
            info!(status, latency_ms, "request completed");
        }
    }
}
