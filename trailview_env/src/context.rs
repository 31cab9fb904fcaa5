//! Frame clock trait for TrailView drivers.

use async_trait::async_trait;
use std::time::Duration;

/// Time source used by replay drivers to pace frames.
///
/// # Implementations
///
/// - **Production**: `TokioClock` - wraps `tokio::time` and `Instant`
/// - **Simulation**: `SimClock` (in `trailview_sim`) - virtual time that only
///   advances when a frame sleeps
///
/// The engine itself never reads a clock. Drivers measure the time between
/// frames here and hand it to the host as the elapsed frame time.
#[async_trait]
pub trait FrameClock: Send + Sync + 'static {
    /// Returns the monotonic time since the clock was created.
    fn now(&self) -> Duration;

    /// Suspends until the next frame is due.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances the virtual clock
    async fn sleep(&self, duration: Duration);
}
