//! Event plumbing between playback engines and the controller.
//!
//! Engines, the video surface and the fallback timer never call back into the
//! controller directly. They push [`PlayerEvent`]s through an [`EventSink`]
//! stamped with the [`AttemptId`] of the attachment that created them, and the
//! controller applies queued events one at a time. An event whose attempt id
//! is no longer current belongs to a disposed engine and is dropped.

use std::fmt;
use tokio::sync::mpsc;

/// Identity of one engine attachment. Every attach (including escalation
/// within a session) gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

impl AttemptId {
    pub(crate) const NONE: AttemptId = AttemptId(0);

    pub(crate) fn next(self) -> AttemptId {
        AttemptId(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Signals reported by engines, the surface and the fallback timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Adaptive engine parsed the master/media manifest.
    ManifestParsed,
    /// Adaptive engine error. Only `fatal` errors escalate.
    EngineError { fatal: bool, details: String },
    /// DASH engine reported an error.
    DashError { details: String },
    /// DASH engine started rendering frames.
    PlaybackStarted,
    /// Native element finished loading metadata for a directly set source.
    LoadedMetadata,
    /// Native element reported a media error.
    MediaError { details: String },
    /// The promise returned by `play()` resolved.
    PlayResolved,
    /// The promise returned by `play()` rejected (autoplay policy and similar).
    PlayRejected { reason: String },
    /// The embedded fallback frame fired its load signal.
    FrameLoaded,
    /// The embedded fallback frame failed explicitly.
    FrameError { details: String },
    /// The fallback confirmation window elapsed.
    FallbackTimeout,
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::ManifestParsed => "manifest-parsed",
            EngineEvent::EngineError { .. } => "engine-error",
            EngineEvent::DashError { .. } => "dash-error",
            EngineEvent::PlaybackStarted => "playback-started",
            EngineEvent::LoadedMetadata => "loaded-metadata",
            EngineEvent::MediaError { .. } => "media-error",
            EngineEvent::PlayResolved => "play-resolved",
            EngineEvent::PlayRejected { .. } => "play-rejected",
            EngineEvent::FrameLoaded => "frame-loaded",
            EngineEvent::FrameError { .. } => "frame-error",
            EngineEvent::FallbackTimeout => "fallback-timeout",
        }
    }
}

/// An [`EngineEvent`] tagged with the attachment that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEvent {
    pub attempt: AttemptId,
    pub kind: EngineEvent,
}

/// Cloneable handle engines use to report back to the controller.
#[derive(Debug, Clone)]
pub struct EventSink {
    attempt: AttemptId,
    tx: mpsc::UnboundedSender<PlayerEvent>,
}

impl EventSink {
    pub(crate) fn new(attempt: AttemptId, tx: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        Self { attempt, tx }
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Queue an event. Returns `false` once the controller is gone.
    pub fn emit(&self, kind: EngineEvent) -> bool {
        self.tx
            .send(PlayerEvent {
                attempt: self.attempt,
                kind,
            })
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_stamps_events_with_its_attempt() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let attempt = AttemptId::NONE.next().next();
        let sink = EventSink::new(attempt, tx);

        assert!(sink.emit(EngineEvent::ManifestParsed));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.attempt, attempt);
        assert_eq!(event.kind, EngineEvent::ManifestParsed);
        assert_eq!(attempt.value(), 2);
    }

    #[test]
    fn emit_reports_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(AttemptId::NONE.next(), tx);
        drop(rx);
        assert!(!sink.emit(EngineEvent::FrameLoaded));
    }
}
