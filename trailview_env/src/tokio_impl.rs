//! Production implementation of FrameClock using Tokio.

use crate::FrameClock;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Wall-clock frame pacing backed by Tokio.
///
/// Used when a replay should run at real speed, e.g. while a viewer is
/// attached.
pub struct TokioClock {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioClock {
    /// Creates a new TokioClock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameClock for TokioClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
