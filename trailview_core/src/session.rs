//! Replay Session - binds a playback to a rendering host.
//!
//! The controller decides *what* happens each frame; the session forwards it
//! to the host:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     ReplaySession                      │
//! │  ┌──────────────────────┐     ┌─────────────────────┐  │
//! │  │ PlaybackController   │     │ RenderHost          │  │
//! │  │  • step(dt)          │────►│  • set_position     │  │
//! │  │  • trail             │     │  • set_rotation     │  │
//! │  │  • obstacle reveals  │     │  • append_trail_pt  │  │
//! │  └──────────────────────┘     │  • set_visible      │  │
//! │                               └─────────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let path = PathTable::load(&path_rows, config.path_min_fields, config.scale);
//! let obstacles = ObstacleTable::load(&obs_rows, config.obstacle_min_fields, path.origin(), config.scale)?;
//! let controller = PlaybackController::new(path, obstacles, &config)?;
//!
//! let mut session = ReplaySession::start(host, &mut camera, controller, &config)?;
//! while session.tick()?.is_some() {}
//! ```

use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::playback::{PlaybackController, PlaybackPhase, StepOutcome};
use serde::Serialize;
use tracing::{debug, info};
use trailview_env::{CameraRig, MarkerHandle, RenderHost};

/// End-of-run numbers for logs and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub waypoint_count: usize,
    pub obstacle_count: usize,
    pub steps: u64,
    pub segments_completed: usize,
    pub trail_len: usize,
    pub revealed: Vec<usize>,
    pub phase: PlaybackPhase,
}

/// A playback attached to a `RenderHost`.
pub struct ReplaySession<H: RenderHost> {
    host: H,
    controller: PlaybackController,

    /// The moving marker
    marker: MarkerHandle,

    /// Host markers for each obstacle, by obstacle index
    obstacle_markers: Vec<MarkerHandle>,
}

impl<H: RenderHost> ReplaySession<H> {
    /// Spawns the scene and starts the playback.
    ///
    /// Order: moving marker, camera target, hidden obstacle markers, marker
    /// scale, then `Idle -> Running` (or straight to `Finished`).
    pub fn start<C>(
        mut host: H,
        camera: &mut C,
        mut controller: PlaybackController,
        config: &ReplayConfig,
    ) -> Result<Self, ReplayError>
    where
        C: CameraRig + ?Sized,
    {
        let marker = host.spawn_moving_marker()?;
        camera.set_follow_target(marker);

        let obstacle_scale = config.obstacle_marker_scale();
        let mut obstacle_markers = Vec::with_capacity(controller.obstacles().len());
        for obstacle in controller.obstacles().markers() {
            let handle = host.spawn_static_marker(obstacle.position, obstacle.heading)?;
            host.set_scale(handle, obstacle_scale)?;
            host.set_visible(handle, false)?;
            obstacle_markers.push(handle);
        }
        debug!("Spawned {} obstacle markers", obstacle_markers.len());

        host.set_scale(marker, config.marker_scale())?;

        let phase = controller.start();
        info!("Replay session started ({:?}) with {}", phase, marker);

        Ok(Self {
            host,
            controller,
            marker,
            obstacle_markers,
        })
    }

    /// Runs one frame: steps the playback with the host's frame time and
    /// pushes the result to the host. Returns `Ok(None)` once finished.
    ///
    /// The controller advances before the host is updated. When a host call
    /// fails, the step is already in the trail and its reveal flags are set,
    /// but the host may have missed some of the frame's updates. A host error
    /// ends the session; do not keep ticking after one.
    pub fn tick(&mut self) -> Result<Option<StepOutcome>, ReplayError> {
        let dt = self.host.elapsed_frame_time();
        let Some(outcome) = self.controller.step(dt)? else {
            return Ok(None);
        };

        self.host.set_position(self.marker, outcome.position)?;
        self.host.set_rotation(self.marker, outcome.heading)?;
        self.host.append_trail_point(outcome.position)?;

        for &index in &outcome.revealed {
            if let Some(&handle) = self.obstacle_markers.get(index) {
                self.host.set_visible(handle, true)?;
            }
        }

        Ok(Some(outcome))
    }

    /// Ticks until the playback finishes or `max_frames` frames have run.
    /// Returns the number of frames that produced a step.
    pub fn run_to_end(&mut self, max_frames: u64) -> Result<u64, ReplayError> {
        let mut frames = 0;
        while frames < max_frames {
            if self.tick()?.is_none() {
                break;
            }
            frames += 1;
        }
        Ok(frames)
    }

    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary {
            waypoint_count: self.controller.path().len(),
            obstacle_count: self.controller.obstacles().len(),
            steps: self.controller.steps(),
            segments_completed: self.controller.segments_completed(),
            trail_len: self.controller.trail().len(),
            revealed: self.controller.obstacles().revealed_indices(),
            phase: self.controller.phase(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.controller.is_finished()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn marker(&self) -> MarkerHandle {
        self.marker
    }

    pub fn obstacle_markers(&self) -> &[MarkerHandle] {
        &self.obstacle_markers
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
