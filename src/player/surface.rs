//! The video surface and the runtime that hands out engines for it.

use serde::Serialize;

use super::engine::{AdaptiveEngine, AdaptiveEngineConfig, DashEngine};
use super::events::EventSink;
use crate::streaming::classification::HLS_NATIVE_MIME;

/// The on-page element that renders decoded video.
///
/// Methods that complete asynchronously take an [`EventSink`] and report
/// through it instead of returning a value.
pub trait VideoSurface {
    fn can_play_type(&self, mime: &str) -> bool;

    /// Set `src` directly and report `LoadedMetadata` / `MediaError`.
    fn set_source(&mut self, url: &str, events: EventSink);

    /// Append a `<source>` child with an explicit MIME type.
    fn append_source(&mut self, url: &str, mime: &str);

    fn load(&mut self);

    /// Start playback and report `PlayResolved` / `PlayRejected`.
    fn play(&mut self, completion: EventSink);

    /// Pause, clear the source and `<source>` children, drop listeners, reload.
    fn reset(&mut self);

    /// Swap the element for a frame at `url`; report `FrameLoaded` / `FrameError`.
    fn embed_frame(&mut self, url: &str, events: EventSink);

    /// Swap an embedded frame back for a fresh video element. No-op otherwise.
    fn restore(&mut self);

    fn is_embedded(&self) -> bool;
}

/// What the host environment can do, sampled when a session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RuntimeCapabilities {
    pub adaptive_engine: bool,
    pub native_hls: bool,
}

/// Host environment owning the surface and constructing engines bound to it.
pub trait PlayerRuntime {
    fn surface(&mut self) -> &mut dyn VideoSurface;

    fn adaptive_supported(&self) -> bool;

    fn create_adaptive(
        &mut self,
        config: &AdaptiveEngineConfig,
        events: EventSink,
    ) -> Box<dyn AdaptiveEngine>;

    fn create_dash(&mut self, events: EventSink) -> Box<dyn DashEngine>;

    fn capabilities(&mut self) -> RuntimeCapabilities {
        RuntimeCapabilities {
            adaptive_engine: self.adaptive_supported(),
            native_hls: self.surface().can_play_type(HLS_NATIVE_MIME),
        }
    }
}
