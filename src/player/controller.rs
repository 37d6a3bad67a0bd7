//! Playback controller
//!
//! Binds one video surface to at most one playback engine and walks the
//! fallback chain chosen by the stream classifier:
//!
//! ```text
//! Idle -> Loading(strategy) -> Playing(strategy)
//!                           \-> escalate -> Loading(next) -> ... -> Playing | Failed
//! ```
//!
//! Every strategy except the embedded fallback escalates on failure. The
//! embedded fallback is confirmed by a frame load within the configured window
//! (5 s by default) or declared failed, which is the only failure the user
//! sees. `close()` returns to `Idle` from any state.
//!
//! Engines report through [`EventSink`]s tagged with the attachment's
//! [`AttemptId`](super::events::AttemptId). Events are queued and applied with
//! [`PlaybackController::process_pending`] or [`PlaybackController::next_event`];
//! anything from a disposed attachment is dropped.

use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::engine::{ActiveEngine, EngineKind};
use super::events::{EngineEvent, EventSink, PlayerEvent};
use super::session::{PlaybackSession, PlaybackState};
use super::strategy::{Strategy, plan};
use super::surface::PlayerRuntime;
use super::timer::FallbackTimer;
use super::ui::PlayerUi;
use crate::config::PlayerConfig;
use crate::streaming::{classify, fallback_proxy_url};

/// Arguments for [`PlaybackController::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub channel_id: String,
    pub stream_url: String,
    pub display_name: String,
    pub display_meta: String,
    pub logo_url: Option<String>,
}

impl OpenRequest {
    pub fn new(
        channel_id: impl Into<String>,
        stream_url: impl Into<String>,
        display_name: impl Into<String>,
        display_meta: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            stream_url: stream_url.into(),
            display_name: display_name.into(),
            display_meta: display_meta.into(),
            logo_url: None,
        }
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}

/// Why a strategy was abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationCause {
    FatalEngineError(String),
    AutoplayRejected(String),
    MediaError(String),
    EmptySource,
    FallbackTimedOut,
    FallbackFrameError(String),
    TimerUnavailable,
}

impl fmt::Display for EscalationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationCause::FatalEngineError(details) => write!(f, "fatal engine error: {details}"),
            EscalationCause::AutoplayRejected(reason) => write!(f, "play() rejected: {reason}"),
            EscalationCause::MediaError(details) => write!(f, "media error: {details}"),
            EscalationCause::EmptySource => f.write_str("empty stream url"),
            EscalationCause::FallbackTimedOut => f.write_str("fallback frame did not load in time"),
            EscalationCause::FallbackFrameError(details) => {
                write!(f, "fallback frame error: {details}")
            }
            EscalationCause::TimerUnavailable => f.write_str("no runtime to arm the fallback timer"),
        }
    }
}

pub struct PlaybackController<R: PlayerRuntime> {
    runtime: R,
    config: PlayerConfig,
    session: PlaybackSession,
    ui: PlayerUi,
    events_tx: mpsc::UnboundedSender<PlayerEvent>,
    events_rx: mpsc::UnboundedReceiver<PlayerEvent>,
}

impl<R: PlayerRuntime> PlaybackController<R> {
    pub fn new(runtime: R, config: PlayerConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            config,
            session: PlaybackSession::default(),
            ui: PlayerUi::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn active_engine(&self) -> EngineKind {
        self.session.engine_kind()
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn ui(&self) -> &PlayerUi {
        &self.ui
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Start a fresh session, tearing down whatever was playing.
    pub fn open(&mut self, request: OpenRequest) {
        if self.session.teardown(self.runtime.surface()) {
            debug!(
                target = "player.controller",
                "previous session torn down before open"
            );
        }

        self.ui.show(
            &request.display_name,
            &request.display_meta,
            request.logo_url.clone(),
        );
        self.ui.begin_loading();

        let stream = classify(&request.stream_url);
        let capabilities = self.runtime.capabilities();
        let chain = plan(stream.hint, capabilities);

        info!(
            target = "player.controller",
            channel = %request.channel_id,
            url = %stream.display_url,
            hint = %stream.hint,
            chain = ?chain.to_vec(),
            "opening stream"
        );

        self.session.chain = chain;
        self.session.stream = Some(stream);
        self.session.channel_id = Some(request.channel_id);

        match self.session.chain.next() {
            Some(first) => self.start(first),
            None => self.fail(EscalationCause::EmptySource),
        }
    }

    /// Tear down the session and hide the player. Safe to call at any time.
    pub fn close(&mut self) {
        let channel = self.session.channel_id.clone();
        let disposed = self.session.teardown(self.runtime.surface());
        self.ui.hide();
        if disposed {
            info!(
                target = "player.controller",
                channel = channel.as_deref().unwrap_or(""),
                "player closed"
            );
        }
    }

    /// Apply every event queued so far. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.handle_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next event and apply it.
    pub async fn next_event(&mut self) -> Option<PlayerEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    /// Apply a single event. Returns `false` when it was stale or irrelevant.
    pub fn handle_event(&mut self, event: PlayerEvent) -> bool {
        if event.attempt != self.session.attempt {
            debug!(
                target = "player.controller",
                attempt = %event.attempt,
                current = %self.session.attempt,
                event = event.kind.name(),
                "dropping event from disposed engine"
            );
            return false;
        }

        let state = self.session.state;
        let Some(strategy) = state.strategy() else {
            debug!(
                target = "player.controller",
                %state,
                event = event.kind.name(),
                "ignoring event outside an active strategy"
            );
            return false;
        };
        let loading = matches!(state, PlaybackState::Loading(_));

        match (strategy, event.kind) {
            (Strategy::Adaptive, EngineEvent::ManifestParsed)
            | (Strategy::NativeHls, EngineEvent::LoadedMetadata)
                if loading =>
            {
                let completion = self.current_sink();
                self.runtime.surface().play(completion);
            }
            (Strategy::Adaptive, EngineEvent::EngineError { fatal: true, details }) => {
                self.escalate(strategy, EscalationCause::FatalEngineError(details));
            }
            (Strategy::Adaptive, EngineEvent::EngineError { fatal: false, details }) => {
                debug!(
                    target = "player.controller",
                    %details,
                    "non-fatal adaptive engine error"
                );
                return false;
            }
            (Strategy::Dash, EngineEvent::DashError { details }) => {
                self.escalate(strategy, EscalationCause::FatalEngineError(details));
            }
            (Strategy::Dash, EngineEvent::PlaybackStarted) if loading => {
                self.mark_playing(strategy);
            }
            (
                Strategy::NativeHls | Strategy::Progressive,
                EngineEvent::MediaError { details },
            ) => {
                self.escalate(strategy, EscalationCause::MediaError(details));
            }
            (
                Strategy::Adaptive | Strategy::NativeHls | Strategy::Dash | Strategy::Progressive,
                EngineEvent::PlayResolved,
            ) if loading => {
                self.mark_playing(strategy);
            }
            (
                Strategy::Adaptive | Strategy::NativeHls | Strategy::Dash | Strategy::Progressive,
                EngineEvent::PlayRejected { reason },
            ) => {
                self.escalate(strategy, EscalationCause::AutoplayRejected(reason));
            }
            (Strategy::EmbeddedFallback, EngineEvent::FrameLoaded) if loading => {
                self.session.cancel_timer();
                self.mark_playing(strategy);
            }
            (Strategy::EmbeddedFallback, EngineEvent::FallbackTimeout) if loading => {
                self.fail(EscalationCause::FallbackTimedOut);
            }
            (Strategy::EmbeddedFallback, EngineEvent::FrameError { details }) if loading => {
                self.fail(EscalationCause::FallbackFrameError(details));
            }
            (_, kind) => {
                debug!(
                    target = "player.controller",
                    %state,
                    event = kind.name(),
                    "event has no effect in current state"
                );
                return false;
            }
        }
        true
    }

    fn current_sink(&self) -> EventSink {
        EventSink::new(self.session.attempt, self.events_tx.clone())
    }

    /// Dispose the current engine, then attach `strategy` under a fresh attempt id.
    fn start(&mut self, strategy: Strategy) {
        self.session.cancel_timer();
        self.session.release_engine(self.runtime.surface());
        self.session.attempt = self.session.attempt.next();
        self.session.state = PlaybackState::Loading(strategy);

        let Some((url, mime, empty)) = self
            .session
            .stream
            .as_ref()
            .map(|s| (s.url.clone(), s.mime, s.is_empty()))
        else {
            self.fail(EscalationCause::EmptySource);
            return;
        };
        let sink = self.current_sink();

        debug!(
            target = "player.controller",
            %strategy,
            attempt = %self.session.attempt,
            "attaching engine"
        );

        match strategy {
            Strategy::Adaptive => {
                let mut engine = self.runtime.create_adaptive(&self.config.adaptive, sink);
                engine.load_source(&url);
                engine.attach_media();
                self.session.engine = ActiveEngine::Adaptive(engine);
            }
            Strategy::NativeHls => {
                self.runtime.surface().set_source(&url, sink);
                self.session.engine = ActiveEngine::Native;
            }
            Strategy::Dash => {
                let mut engine = self.runtime.create_dash(sink);
                engine.initialize(&url, true);
                self.session.engine = ActiveEngine::Dash(engine);
            }
            Strategy::Progressive => {
                if empty {
                    self.escalate(strategy, EscalationCause::EmptySource);
                    return;
                }
                let surface = self.runtime.surface();
                surface.append_source(&url, mime);
                surface.load();
                surface.play(sink);
                self.session.engine = ActiveEngine::Progressive;
            }
            Strategy::EmbeddedFallback => {
                let frame_url = fallback_proxy_url(&self.config.fallback_route, &url);
                self.runtime.surface().embed_frame(&frame_url, sink.clone());
                self.session.engine = ActiveEngine::EmbeddedFallback;
                match FallbackTimer::start(self.config.fallback_timeout, sink) {
                    Ok(timer) => self.session.fallback_timer = Some(timer),
                    Err(e) => {
                        warn!(target = "player.controller", error = %e, "cannot arm fallback timer");
                        self.fail(EscalationCause::TimerUnavailable);
                    }
                }
            }
        }
    }

    fn escalate(&mut self, from: Strategy, cause: EscalationCause) {
        match self.session.chain.next() {
            Some(next) => {
                info!(
                    target = "player.controller",
                    %from,
                    to = %next,
                    %cause,
                    "escalating playback strategy"
                );
                self.ui.begin_loading();
                self.start(next);
            }
            None => self.fail(cause),
        }
    }

    fn mark_playing(&mut self, strategy: Strategy) {
        self.session.state = PlaybackState::Playing(strategy);
        self.ui.playback_started();
        info!(target = "player.controller", %strategy, "playback started");
    }

    /// Terminal failure. The attached frame stays until the next open/close.
    fn fail(&mut self, cause: EscalationCause) {
        self.session.cancel_timer();
        self.session.chain.clear();
        self.session.state = PlaybackState::Failed;
        self.ui.terminal_failure();
        warn!(
            target = "player.controller",
            channel = self.session.channel_id.as_deref().unwrap_or(""),
            %cause,
            "playback failed"
        );
    }
}

impl<R: PlayerRuntime> Drop for PlaybackController<R> {
    fn drop(&mut self) {
        self.session.teardown(self.runtime.surface());
    }
}
