//! The "PLAYBACK" Engine - frame-driven replay along the recorded path
//!
//! Playback is a resumable step function. Each call:
//! 1. Interpolates the marker between waypoints `i` and `i + 1` at the
//!    current segment progress
//! 2. Takes the heading of waypoint `i`, inverted for the display frame
//! 3. Appends the position to the trail
//! 4. Reveals obstacles near the position
//! 5. Advances progress by `dt * speed`, rolling over to the next segment
//!    once it reaches 1.0
//!
//! ```text
//!            start()                     last segment done
//!   Idle ─────────────► Running ───────────────────────────► Finished
//!     │                                                          ▲
//!     └──────────────── fewer than 2 waypoints ──────────────────┘
//! ```
//!
//! The only state carried between frames is `(segment_index, segment_progress)`.
//! `step` takes `&mut self`, so a controller can never be stepped re-entrantly.

use crate::config::ReplayConfig;
use crate::error::{LoadError, ReplayError};
use crate::proximity::ProximityRevealer;
use crate::tables::{ObstacleTable, PathTable};
use serde::Serialize;
use tracing::{debug, info};
use trailview_env::LocalPoint;

/// Lifecycle of a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackPhase {
    Idle,
    Running,
    /// Terminal
    Finished,
}

/// Position within the path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlaybackState {
    /// Index of the waypoint the current segment starts at
    pub segment_index: usize,

    /// Progress through the current segment, in [0, 1)
    pub segment_progress: f64,
}

/// The traversed path, in step order. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trail {
    points: Vec<LocalPoint>,
}

impl Trail {
    fn push(&mut self, point: LocalPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[LocalPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&LocalPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// What a single step produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// 1-based step counter
    pub step: u64,

    /// Segment this step was taken on
    pub segment_index: usize,

    /// Marker position (also appended to the trail)
    pub position: LocalPoint,

    /// Display rotation in degrees: the negated logged heading
    pub heading: f64,

    /// Obstacles revealed by this step, ascending
    pub revealed: Vec<usize>,

    /// True when this step completed the last segment
    pub finished: bool,
}

/// Drives the marker along a `PathTable` and reveals `ObstacleTable` entries.
///
/// Exclusively owns the playback state, the trail and the obstacle table for
/// the lifetime of the replay.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    path: PathTable,
    obstacles: ObstacleTable,
    revealer: ProximityRevealer,
    speed: f64,
    phase: PlaybackPhase,
    state: PlaybackState,
    trail: Trail,
    steps: u64,
    segments_completed: usize,
}

impl PlaybackController {
    /// Creates a controller using `speed` and `proximity_threshold` from a
    /// validated `config`.
    pub fn new(path: PathTable, obstacles: ObstacleTable, config: &ReplayConfig) -> Result<Self, ReplayError> {
        config.validate()?;
        Self::with_params(path, obstacles, config.speed, config.proximity_threshold)
    }

    /// Fails unless both `speed` and `threshold` are positive and finite. A
    /// non-positive speed would never leave the first segment.
    pub fn with_params(
        path: PathTable,
        obstacles: ObstacleTable,
        speed: f64,
        threshold: f64,
    ) -> Result<Self, ReplayError> {
        for (name, value) in [("speed", speed), ("threshold", threshold)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LoadError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                ))
                .into());
            }
        }

        Ok(Self {
            path,
            obstacles,
            revealer: ProximityRevealer::new(threshold),
            speed,
            phase: PlaybackPhase::Idle,
            state: PlaybackState::default(),
            trail: Trail::default(),
            steps: 0,
            segments_completed: 0,
        })
    }

    /// Leaves `Idle`. Goes straight to `Finished` when there is no segment to
    /// traverse. Has no effect in any other phase.
    pub fn start(&mut self) -> PlaybackPhase {
        if self.phase != PlaybackPhase::Idle {
            return self.phase;
        }

        self.state = PlaybackState::default();
        if self.path.len() < 2 {
            info!("Playback finished immediately: {} waypoint(s)", self.path.len());
            self.phase = PlaybackPhase::Finished;
        } else {
            info!(
                "Playback started: {} waypoints, {} obstacles, speed {}",
                self.path.len(),
                self.obstacles.len(),
                self.speed
            );
            self.phase = PlaybackPhase::Running;
        }
        self.phase
    }

    /// Advances playback by one frame of `dt` seconds.
    ///
    /// Starts the playback first if it is still `Idle`. Returns `Ok(None)`
    /// once finished; nothing is mutated after that.
    pub fn step(&mut self, dt: f64) -> Result<Option<StepOutcome>, ReplayError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ReplayError::InvalidDelta(dt));
        }

        if self.phase == PlaybackPhase::Idle {
            self.start();
        }
        if self.phase == PlaybackPhase::Finished {
            return Ok(None);
        }

        let segment_index = self.state.segment_index;
        let waypoints = self.path.waypoints();
        let (start, end) = (&waypoints[segment_index], &waypoints[segment_index + 1]);

        let position = LocalPoint::lerp(&start.position, &end.position, self.state.segment_progress);
        let heading = -start.heading;

        self.trail.push(position);
        let revealed = self.revealer.reveal(position, &mut self.obstacles);
        self.steps += 1;

        for index in &revealed {
            info!("Obstacle {} revealed at step {} near {}", index, self.steps, position);
        }

        self.state.segment_progress += dt * self.speed;
        if self.state.segment_progress >= 1.0 {
            self.state.segment_progress = 0.0;
            self.state.segment_index += 1;
            self.segments_completed += 1;
            debug!("Segment {} complete after {} steps", segment_index, self.steps);

            if self.state.segment_index >= self.path.len() - 1 {
                self.phase = PlaybackPhase::Finished;
                info!(
                    "Playback finished: {} steps, {} segments, {}/{} obstacles revealed",
                    self.steps,
                    self.segments_completed,
                    self.obstacles.revealed_count(),
                    self.obstacles.len()
                );
            }
        }

        Ok(Some(StepOutcome {
            step: self.steps,
            segment_index,
            position,
            heading,
            revealed,
            finished: self.phase == PlaybackPhase::Finished,
        }))
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == PlaybackPhase::Finished
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn path(&self) -> &PathTable {
        &self.path
    }

    pub fn obstacles(&self) -> &ObstacleTable {
        &self.obstacles
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn threshold(&self) -> f64 {
        self.revealer.threshold()
    }

    /// Steps taken so far (equals the trail length).
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn segments_completed(&self) -> usize {
        self.segments_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ObstacleMarker, Waypoint};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn path(points: &[(f64, f64, f64)]) -> PathTable {
        PathTable::from_waypoints(
            None,
            points
                .iter()
                .map(|&(x, y, heading)| Waypoint {
                    position: LocalPoint::new(x, y),
                    heading,
                })
                .collect(),
        )
    }

    fn unit_segment() -> PlaybackController {
        PlaybackController::with_params(path(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]), ObstacleTable::default(), 5.0, 0.05)
            .unwrap()
    }

    fn run_to_end(controller: &mut PlaybackController, dt: f64) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = controller.step(dt).unwrap() {
            outcomes.push(outcome);
        }
        outcomes
    }

    #[test]
    fn test_idle_until_started() {
        let mut controller = unit_segment();
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
        assert_eq!(controller.start(), PlaybackPhase::Running);
        assert_eq!(controller.state(), PlaybackState::default());
    }

    #[test]
    fn test_non_positive_speed_rejected() {
        let two = || path(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);

        for speed in [0.0, -1.0, f64::NAN] {
            let err = PlaybackController::with_params(two(), ObstacleTable::default(), speed, 0.05).unwrap_err();
            assert!(matches!(err, ReplayError::Load(LoadError::InvalidConfig(_))));
        }
        assert!(PlaybackController::with_params(two(), ObstacleTable::default(), 5.0, 0.0).is_err());

        let config = ReplayConfig {
            speed: 0.0,
            ..Default::default()
        };
        assert!(PlaybackController::new(two(), ObstacleTable::default(), &config).is_err());
    }

    #[test]
    fn test_empty_path_finishes_immediately() {
        let mut controller =
            PlaybackController::new(path(&[]), ObstacleTable::default(), &ReplayConfig::default()).unwrap();

        assert_eq!(controller.start(), PlaybackPhase::Finished);
        assert!(controller.step(0.1).unwrap().is_none());
        assert!(controller.trail().is_empty());
    }

    #[test]
    fn test_single_waypoint_finishes_immediately() {
        let mut controller =
            PlaybackController::with_params(path(&[(3.0, 4.0, 10.0)]), ObstacleTable::default(), 5.0, 0.05)
                .unwrap();

        assert!(controller.step(0.1).unwrap().is_none());
        assert!(controller.is_finished());
        assert_eq!(controller.steps(), 0);
        assert!(controller.trail().is_empty());
    }

    #[test]
    fn test_first_step_sits_on_first_waypoint() {
        let mut controller = PlaybackController::with_params(
            path(&[(0.0, 0.0, 0.0), (100.0, 0.0, 90.0)]),
            ObstacleTable::default(),
            5.0,
            0.05,
        )
        .unwrap();

        let first = controller.step(0.05).unwrap().unwrap();
        assert_eq!(first.position, LocalPoint::origin());
        assert_eq!(first.heading, 0.0);
        assert_eq!(first.segment_index, 0);
        assert_relative_eq!(controller.state().segment_progress, 0.25);

        let second = controller.step(0.05).unwrap().unwrap();
        assert_relative_eq!(second.position.x, 25.0);
    }

    #[test]
    fn test_heading_is_negated_per_segment() {
        let mut controller = PlaybackController::with_params(
            path(&[(0.0, 0.0, 0.0), (100.0, 0.0, 90.0), (100.0, 100.0, 180.0)]),
            ObstacleTable::default(),
            10.0,
            0.05,
        )
        .unwrap();

        let outcomes = run_to_end(&mut controller, 0.1);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].heading, 0.0);
        assert_eq!(outcomes[1].heading, -90.0);
        assert_eq!(outcomes[1].position, LocalPoint::new(100.0, 0.0));
        assert!(outcomes[1].finished);
    }

    #[test]
    fn test_progress_overshoot_is_discarded() {
        let mut controller = PlaybackController::with_params(
            path(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (20.0, 0.0, 0.0)]),
            ObstacleTable::default(),
            1.0,
            0.05,
        )
        .unwrap();

        controller.step(0.6).unwrap();
        controller.step(0.6).unwrap();
        // 1.2 rolled over to 0.0, not 0.2
        assert_eq!(controller.state(), PlaybackState { segment_index: 1, segment_progress: 0.0 });
        let outcome = controller.step(0.6).unwrap().unwrap();
        assert_eq!(outcome.position, LocalPoint::new(10.0, 0.0));
    }

    #[test]
    fn test_invalid_delta_rejected() {
        let mut controller = unit_segment();

        assert!(matches!(controller.step(-0.1), Err(ReplayError::InvalidDelta(_))));
        assert!(matches!(controller.step(f64::NAN), Err(ReplayError::InvalidDelta(_))));
        assert_eq!(controller.steps(), 0);
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_reveal_fires_on_arrival_not_before() {
        // Obstacle sits exactly on the second waypoint
        let obstacles = ObstacleTable::from_markers(vec![ObstacleMarker::new(LocalPoint::new(100.0, 0.0), 30.0)]);
        let mut controller = PlaybackController::with_params(
            path(&[(0.0, 0.0, 0.0), (100.0, 0.0, 90.0), (200.0, 0.0, 90.0)]),
            obstacles,
            5.0,
            0.05,
        )
        .unwrap();

        // 0.05 * 5.0 = 0.25 per step, so segment 0 never lands near its end
        let outcomes = run_to_end(&mut controller, 0.05);

        let reveal_steps: Vec<_> = outcomes.iter().filter(|o| !o.revealed.is_empty()).collect();
        assert_eq!(reveal_steps.len(), 1);

        let hit = reveal_steps[0];
        assert_eq!(hit.revealed, vec![0]);
        assert_eq!(hit.segment_index, 1);
        assert_eq!(hit.position, LocalPoint::new(100.0, 0.0));

        // Every earlier step was still on the first segment
        assert!(outcomes
            .iter()
            .take_while(|o| o.step < hit.step)
            .all(|o| o.segment_index == 0 && o.revealed.is_empty()));
        assert!(controller.obstacles().markers()[0].is_revealed());
    }

    #[test]
    fn test_finished_is_terminal() {
        let mut controller = unit_segment();

        run_to_end(&mut controller, 0.5);
        let trail_len = controller.trail().len();
        let state = controller.state();

        assert_eq!(controller.start(), PlaybackPhase::Finished);
        assert!(controller.step(0.5).unwrap().is_none());
        assert_eq!(controller.trail().len(), trail_len);
        assert_eq!(controller.state(), state);
    }

    proptest! {
        #[test]
        fn prop_terminates_after_n_minus_one_segments(
            n in 2usize..12,
            dt in 0.001f64..0.5,
            speed in 0.5f64..20.0,
        ) {
            let points: Vec<_> = (0..n).map(|i| (i as f64 * 3.0, (i % 2) as f64, i as f64 * 10.0)).collect();
            let mut controller =
                PlaybackController::with_params(path(&points), ObstacleTable::default(), speed, 0.05).unwrap();

            let outcomes = run_to_end(&mut controller, dt);
            let per_segment = (1.0 / (dt * speed)).ceil() as usize;

            prop_assert!(controller.is_finished());
            prop_assert_eq!(controller.segments_completed(), n - 1);
            prop_assert_eq!(controller.steps() as usize, outcomes.len());

            // Trail holds exactly the computed positions, in order
            prop_assert_eq!(controller.trail().len(), outcomes.len());
            for (point, outcome) in controller.trail().points().iter().zip(&outcomes) {
                prop_assert_eq!(*point, outcome.position);
            }

            // One full progress cycle per segment, never more than the bound
            for seg in 0..n - 1 {
                let count = outcomes.iter().filter(|o| o.segment_index == seg).count();
                prop_assert!(count >= 1);
                prop_assert!(count <= per_segment + 1);
            }
        }
    }
}
