//! Per-surface playback session state.

use serde::Serialize;
use std::fmt;

use super::engine::{ActiveEngine, EngineKind};
use super::events::AttemptId;
use super::strategy::{FallbackChain, Strategy};
use super::surface::VideoSurface;
use super::timer::FallbackTimer;
use crate::streaming::StreamReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "strategy", rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Loading(Strategy),
    Playing(Strategy),
    Failed,
}

impl PlaybackState {
    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            PlaybackState::Loading(strategy) | PlaybackState::Playing(strategy) => Some(*strategy),
            PlaybackState::Idle | PlaybackState::Failed => None,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => f.write_str("idle"),
            PlaybackState::Loading(strategy) => write!(f, "loading({strategy})"),
            PlaybackState::Playing(strategy) => write!(f, "playing({strategy})"),
            PlaybackState::Failed => f.write_str("failed"),
        }
    }
}

/// Everything bound to the surface for one `open`.
///
/// The engine slot and the timer slot each hold at most one value; both are
/// released by [`PlaybackSession::teardown`].
#[derive(Debug)]
pub struct PlaybackSession {
    pub(crate) attempt: AttemptId,
    pub(crate) engine: ActiveEngine,
    pub(crate) fallback_timer: Option<FallbackTimer>,
    pub(crate) chain: FallbackChain,
    pub(crate) stream: Option<StreamReference>,
    pub(crate) channel_id: Option<String>,
    pub(crate) state: PlaybackState,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            attempt: AttemptId::NONE,
            engine: ActiveEngine::None,
            fallback_timer: None,
            chain: FallbackChain::default(),
            stream: None,
            channel_id: None,
            state: PlaybackState::Idle,
        }
    }
}

impl PlaybackSession {
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    pub fn stream(&self) -> Option<&StreamReference> {
        self.stream.as_ref()
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn has_pending_timer(&self) -> bool {
        self.fallback_timer.is_some()
    }

    pub(crate) fn cancel_timer(&mut self) {
        if let Some(timer) = self.fallback_timer.take() {
            timer.cancel();
        }
    }

    /// Dispose the current engine only; the session stays open for escalation.
    ///
    /// Returns `true` if an engine was attached.
    pub(crate) fn release_engine(&mut self, surface: &mut dyn VideoSurface) -> bool {
        std::mem::take(&mut self.engine).dispose(surface)
    }

    /// Cancel the timer, dispose the engine and reset to `Idle`.
    ///
    /// The attempt id moves on so that sinks handed out earlier go stale.
    /// Returns `true` if an engine was attached.
    pub(crate) fn teardown(&mut self, surface: &mut dyn VideoSurface) -> bool {
        self.attempt = self.attempt.next();
        self.cancel_timer();
        let disposed = self.release_engine(surface);
        if surface.is_embedded() {
            surface.restore();
        }
        self.chain.clear();
        self.stream = None;
        self.channel_id = None;
        self.state = PlaybackState::Idle;
        disposed
    }
}
