//! Adaptive stream playback.
//!
//! The controller drives a [`PlayerRuntime`] (the host's video surface plus
//! engine constructors) through a fallback chain planned from the stream's
//! [`FormatHint`](crate::streaming::FormatHint).

pub mod controller;
pub mod engine;
pub mod events;
pub mod session;
pub mod strategy;
pub mod surface;
pub mod timer;
pub mod ui;

pub use controller::{EscalationCause, OpenRequest, PlaybackController};
pub use engine::{ActiveEngine, AdaptiveEngine, AdaptiveEngineConfig, DashEngine, EngineKind};
pub use events::{AttemptId, EngineEvent, EventSink, PlayerEvent};
pub use session::{PlaybackSession, PlaybackState};
pub use strategy::{FallbackChain, Strategy, plan};
pub use surface::{PlayerRuntime, RuntimeCapabilities, VideoSurface};
pub use timer::FallbackTimer;
pub use ui::PlayerUi;
