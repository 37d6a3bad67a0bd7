//! Cancellable load-confirmation timer for the embedded fallback.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::events::{EngineEvent, EventSink};
use crate::errors::PlayerError;

/// Emits `FallbackTimeout` through its sink once `timeout` elapses, unless
/// cancelled first. Dropping the timer cancels it.
///
/// The deadline is fixed when the timer is armed, not when its task first runs.
#[derive(Debug)]
pub struct FallbackTimer {
    token: CancellationToken,
}

impl FallbackTimer {
    /// Arm the timer on the current tokio runtime.
    pub fn start(timeout: Duration, events: EventSink) -> Result<Self, PlayerError> {
        let handle = Handle::try_current().map_err(|_| PlayerError::NoAsyncRuntime)?;
        let token = CancellationToken::new();
        let task_token = token.clone();
        let attempt = events.attempt();
        let deadline = Instant::now() + timeout;

        handle.spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    debug!(target = "player.timer", %attempt, "fallback timer cancelled");
                }
                _ = tokio::time::sleep_until(deadline) => {
                    debug!(target = "player.timer", %attempt, "fallback window elapsed");
                    events.emit(EngineEvent::FallbackTimeout);
                }
            }
        });

        Ok(Self { token })
    }

    pub fn cancel(self) {
        self.token.cancel();
    }
}

impl Drop for FallbackTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
