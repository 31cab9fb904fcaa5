//! TrailView Host Abstraction Layer
//!
//! This crate provides the seam between the replay engine and whatever draws
//! it. The engine never talks to a renderer directly; it drives these traits:
//!
//! - **RenderHost**: spawns markers, moves/rotates/scales them, grows the trail
//! - **CameraRig**: follows a marker (smoothing is the rig's own business)
//! - **FrameClock**: time source and frame pacing for drivers
//!
//! # Core Concept: Frame-Driven Replay
//!
//! The replay is a resumable step function called once per frame. The host
//! reports the elapsed frame time, the engine advances one step and pushes the
//! results back through the host callbacks.
//!
//! ```text
//! Driver loop              Engine                     RenderHost
//!    |                        |                           |
//!    |-- tick() ------------->|                           |
//!    |                        |-- elapsed_frame_time() -->|
//!    |                        |-- set_position() -------->|
//!    |                        |-- append_trail_point() -->|
//!    |                        |-- set_visible() --------->|  (on reveal)
//!    |<-- outcome ------------|                           |
//!    |-- clock.sleep(frame) ->|                           |
//! ```

mod context;
mod host;
mod types;
mod error;
mod tokio_impl;

pub use context::FrameClock;
pub use host::{CameraRig, RenderHost};
pub use types::{LocalPoint, MarkerHandle, MarkerScale};
pub use error::EnvError;
pub use tokio_impl::TokioClock;
