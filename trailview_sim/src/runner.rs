//! Replay runner - plays a recorded session to completion.

use crate::camera::FollowCamera;
use crate::error::SimError;
use crate::exporter::{ReplayExport, ReplayFrame};
use crate::host::RecordingHost;
use crate::log::read_rows_from_path;
use crate::visualizer::RerunLogger;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use trailview_core::{
    LoadReport, ObstacleTable, PathTable, PlaybackController, ReplayConfig, ReplaySession, ReplaySummary,
};
use trailview_env::FrameClock;

/// Harness settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames per second (default: 60)
    pub tick_rate_hz: u32,

    /// Hard cap on played frames (default: 1_000_000)
    pub max_frames: u64,

    /// Pace frames on the wall clock instead of virtual time
    pub realtime: bool,

    /// Camera offset from the followed marker (default: [0, 0, -10])
    pub camera_offset: [f64; 3],

    /// Fraction of the remaining distance the camera covers per frame (default: 0.125)
    pub camera_smoothing: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_frames: 1_000_000,
            realtime: false,
            camera_offset: [0.0, 0.0, -10.0],
            camera_smoothing: 0.125,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_rate_hz == 0 {
            return Err(SimError::InvalidConfig("tick_rate_hz must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.camera_smoothing) {
            return Err(SimError::InvalidConfig(format!(
                "camera_smoothing must be in [0, 1], got {}",
                self.camera_smoothing
            )));
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }
}

/// Results from a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub summary: ReplaySummary,

    /// Frames that produced a step
    pub frames: u64,

    /// Clock time when the run ended
    pub time_secs: f64,

    /// False when `max_frames` cut the run short
    pub finished: bool,

    pub path_report: LoadReport,
    pub obstacle_report: LoadReport,

    /// Obstacle markers visible in the scene at the end
    pub visible_obstacles: usize,
}

/// Loads logs and drives a `ReplaySession` over a `RecordingHost`.
pub struct ReplayRunner {
    replay: ReplayConfig,
    sim: SimConfig,
}

impl ReplayRunner {
    pub fn new(replay: ReplayConfig, sim: SimConfig) -> Self {
        Self { replay, sim }
    }

    pub fn replay_config(&self) -> &ReplayConfig {
        &self.replay
    }

    pub fn sim_config(&self) -> &SimConfig {
        &self.sim
    }

    /// Builds both tables from raw rows. The obstacle log is optional.
    pub fn load_tables<R, S>(
        &self,
        path_rows: &[R],
        obstacle_rows: Option<&[R]>,
    ) -> Result<(PathTable, ObstacleTable), SimError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let path = PathTable::load(path_rows, self.replay.path_min_fields, self.replay.scale);
        let obstacles = match obstacle_rows {
            Some(rows) => ObstacleTable::load(
                rows,
                self.replay.obstacle_min_fields,
                path.origin(),
                self.replay.scale,
            )?,
            None => ObstacleTable::default(),
        };
        Ok((path, obstacles))
    }

    /// Reads both logs from disk and plays them.
    pub async fn run_files(
        &self,
        path_file: impl AsRef<Path>,
        obstacle_file: Option<&Path>,
        clock: &dyn FrameClock,
        export: Option<&mut ReplayExport>,
        viz: &RerunLogger,
    ) -> Result<RunResult, SimError> {
        let path_file = path_file.as_ref();
        info!("Loading path log {}", path_file.display());
        let path_rows = read_rows_from_path(path_file)?;
        let obstacle_rows = match obstacle_file {
            Some(file) => {
                info!("Loading obstacle log {}", file.display());
                Some(read_rows_from_path(file)?)
            }
            None => None,
        };

        let (path, obstacles) = self.load_tables(&path_rows, obstacle_rows.as_deref())?;
        self.run(path, obstacles, clock, export, viz).await
    }

    /// Plays loaded tables until the playback finishes or `max_frames` is hit.
    pub async fn run(
        &self,
        path: PathTable,
        obstacles: ObstacleTable,
        clock: &dyn FrameClock,
        mut export: Option<&mut ReplayExport>,
        viz: &RerunLogger,
    ) -> Result<RunResult, SimError> {
        self.replay.validate()?;
        self.sim.validate()?;

        let path_report = path.report().clone();
        let obstacle_report = obstacles.report().clone();

        let frame = self.sim.frame_duration();
        let controller = PlaybackController::new(path, obstacles, &self.replay)?;
        let mut camera = FollowCamera::new(Vector3::from(self.sim.camera_offset), self.sim.camera_smoothing);
        let host = RecordingHost::new(frame.as_secs_f64());
        let mut session = ReplaySession::start(host, &mut camera, controller, &self.replay)?;

        let mut frames = 0u64;
        let mut last = clock.now();

        while !session.is_finished() && frames < self.sim.max_frames {
            clock.sleep(frame).await;
            let now = clock.now();
            session.host_mut().set_frame_time((now - last).as_secs_f64());
            last = now;

            let Some(outcome) = session.tick()? else {
                break;
            };
            frames += 1;

            let camera_pos = camera.update(outcome.position);
            let time_sec = now.as_secs_f64();

            if let Some(export) = export.as_deref_mut() {
                let trail_len = session.controller().trail().len();
                export.add_frame(ReplayFrame::new(time_sec, &outcome, trail_len, camera_pos));
            }

            if viz.is_enabled() {
                viz.set_time(time_sec);
                viz.log_marker(outcome.position);
                viz.log_trail(session.host().trail());
                if !outcome.revealed.is_empty() {
                    viz.log_obstacles(session.controller().obstacles().markers());
                }
            }

            if frames % 60 == 0 {
                debug!(
                    "  frame={} | segment={} | trail={}",
                    frames,
                    outcome.segment_index,
                    session.controller().trail().len()
                );
            }
        }

        let finished = session.is_finished();
        if !finished {
            warn!("Stopped after {} frames without finishing the path", frames);
        }

        let summary = session.summary();
        if let Some(export) = export {
            export.finalize(
                summary.clone(),
                session.controller().obstacles(),
                session.controller().trail().points(),
            );
        }

        let result = RunResult {
            summary,
            frames,
            time_secs: clock.now().as_secs_f64(),
            finished,
            path_report,
            obstacle_report,
            visible_obstacles: session.host().visible_static_count(),
        };

        info!(
            "Replay done: {} frames, {}/{} obstacles revealed",
            result.frames,
            result.summary.revealed.len(),
            result.summary.obstacle_count
        );
        Ok(result)
    }
}
