//! TrailView Core - GPS Trajectory Replay Engine
//!
//! Replays a recorded GPS track as an animated marker in a local 2D frame and
//! reveals obstacle markers as the replay passes close to them:
//! 1. **Geo**: geodetic (lat, lon) to local planar frame, anchored at the first fix
//! 2. **Tables**: path and obstacle logs turned into converted waypoints/markers
//! 3. **Playback**: frame-driven interpolation along the waypoints, with a trail
//! 4. **Proximity**: one-shot reveal of obstacles within a distance threshold
//!
//! `ReplaySession` wires all of it to a `trailview_env::RenderHost`.

pub mod config;
pub mod error;
pub mod geo;
pub mod playback;
pub mod proximity;
pub mod session;
pub mod tables;

// Re-export key types for convenience
pub use config::ReplayConfig;
pub use error::{GeoError, LoadError, ReplayError, RowIssue, RowIssueKind};
pub use geo::{convert, CoordinateConverter, GeoPoint, ReferenceOrigin};
pub use playback::{PlaybackController, PlaybackPhase, PlaybackState, StepOutcome, Trail};
pub use proximity::{reveal, ProximityRevealer};
pub use session::{ReplaySession, ReplaySummary};
pub use tables::{LoadReport, ObstacleMarker, ObstacleTable, PathTable, Waypoint};
pub use trailview_env::LocalPoint;
