//! Playback engine seams and the tagged engine slot owned by a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::surface::VideoSurface;

/// Construction options for the adaptive (segmented manifest) engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveEngineConfig {
    #[serde(default)]
    pub debug: bool,
    /// Offload demuxing to a worker.
    #[serde(default = "default_true")]
    pub enable_worker: bool,
    #[serde(default = "default_true")]
    pub low_latency_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AdaptiveEngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            enable_worker: true,
            low_latency_mode: true,
        }
    }
}

/// In-page adaptive streaming engine (an hls.js style library).
///
/// Implementations report `ManifestParsed` and `EngineError` through the
/// sink they were created with.
pub trait AdaptiveEngine {
    fn load_source(&mut self, url: &str);
    fn attach_media(&mut self);
    /// Release media resources and unregister every listener.
    fn destroy(&mut self);
}

/// DASH-capable engine (a dash.js style library).
///
/// Implementations report `PlaybackStarted` and `DashError` through the sink
/// they were created with.
pub trait DashEngine {
    fn initialize(&mut self, url: &str, autoplay: bool);
    /// Tear down the engine and unregister every listener.
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    None,
    Adaptive,
    Native,
    Dash,
    Progressive,
    EmbeddedFallback,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::None => "none",
            EngineKind::Adaptive => "adaptive",
            EngineKind::Native => "native",
            EngineKind::Dash => "dash",
            EngineKind::Progressive => "progressive",
            EngineKind::EmbeddedFallback => "embedded-fallback",
        };
        f.write_str(name)
    }
}

/// The engine currently bound to the surface. `None` holds no instance.
#[derive(Default)]
pub enum ActiveEngine {
    #[default]
    None,
    Adaptive(Box<dyn AdaptiveEngine>),
    /// Source set directly on the element; the surface holds the listeners.
    Native,
    Dash(Box<dyn DashEngine>),
    /// `<source>` child appended to the element.
    Progressive,
    /// The element has been swapped for a fallback frame.
    EmbeddedFallback,
}

impl ActiveEngine {
    pub fn kind(&self) -> EngineKind {
        match self {
            ActiveEngine::None => EngineKind::None,
            ActiveEngine::Adaptive(_) => EngineKind::Adaptive,
            ActiveEngine::Native => EngineKind::Native,
            ActiveEngine::Dash(_) => EngineKind::Dash,
            ActiveEngine::Progressive => EngineKind::Progressive,
            ActiveEngine::EmbeddedFallback => EngineKind::EmbeddedFallback,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ActiveEngine::None)
    }

    /// Release whatever is attached and leave a pristine video element behind.
    ///
    /// Returns `false` when nothing was attached.
    pub fn dispose(self, surface: &mut dyn VideoSurface) -> bool {
        let kind = self.kind();
        match self {
            ActiveEngine::None => return false,
            ActiveEngine::Adaptive(mut engine) => engine.destroy(),
            ActiveEngine::Dash(mut engine) => engine.reset(),
            ActiveEngine::EmbeddedFallback => surface.restore(),
            ActiveEngine::Native | ActiveEngine::Progressive => {}
        }
        surface.reset();
        debug!(target = "player.engine", engine = %kind, "engine disposed");
        true
    }
}

impl fmt::Debug for ActiveEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActiveEngine").field(&self.kind()).finish()
    }
}
