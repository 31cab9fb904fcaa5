//! TrailView Headless Replay Harness
//!
//! Plays a recorded session to completion without a window. Everything the
//! engine would normally push into a scene graph is captured instead:
//!
//! - **Time**: `SimClock` advances only when a frame sleeps, so runs are
//!   repeatable; `--realtime` swaps in `TokioClock`
//! - **Scene**: `RecordingHost` keeps every marker, its transform and the trail
//! - **Camera**: `FollowCamera` eases toward the followed marker each frame
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ReplayRunner                          │
//! │  ┌───────────┐   rows   ┌───────────────┐                   │
//! │  │ CSV logs  │─────────►│ Path/Obstacle │                   │
//! │  └───────────┘          │    tables     │                   │
//! │                         └──────┬────────┘                   │
//! │                                ▼                            │
//! │  ┌───────────┐  dt   ┌──────────────────┐   ┌────────────┐  │
//! │  │ FrameClock│──────►│  ReplaySession   │──►│RecordingHost│ │
//! │  └───────────┘       └──────────────────┘   └─────┬──────┘  │
//! │                                                   ▼         │
//! │                 FollowCamera / ReplayExport / RerunLogger   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use trailview_sim::{ReplayRunner, SimConfig, SimClock};
//!
//! let runner = ReplayRunner::new(ReplayConfig::default(), SimConfig::default());
//! let result = runner.run_files("path.csv", Some("obstacles.csv"), &SimClock::new()).await?;
//! println!("{} frames, finished={}", result.frames, result.finished);
//! ```

mod camera;
mod context;
mod error;
mod host;
pub mod exporter;
pub mod log;
pub mod runner;
pub mod visualizer;

pub use camera::FollowCamera;
pub use context::SimClock;
pub use error::SimError;
pub use exporter::{ExportedObstacle, ReplayExport, ReplayFrame};
pub use host::{MarkerKind, MarkerState, RecordingHost};
pub use runner::{ReplayRunner, RunResult, SimConfig};
pub use visualizer::RerunLogger;
