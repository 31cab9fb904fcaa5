//! Virtual frame clock for repeatable replays.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trailview_env::FrameClock;

/// Frame clock backed by virtual time.
///
/// Time starts at zero and moves only through `sleep` or `advance_time`, so
/// two runs over the same logs see identical frame deltas.
pub struct SimClock {
    /// Current virtual time (nanoseconds since the clock was created)
    virtual_time_ns: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            virtual_time_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        self.virtual_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn time_ns(&self) -> u64 {
        self.virtual_time_ns.load(Ordering::SeqCst)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SimClock {
    fn clone(&self) -> Self {
        Self {
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
        }
    }
}

#[async_trait]
impl FrameClock for SimClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    async fn sleep(&self, duration: Duration) {
        // Sleeping is the only way a frame passes
        self.advance_time(duration);
    }
}
