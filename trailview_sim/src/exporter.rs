//! JSON exporter for replay runs.
//!
//! Exports every played frame plus the final scene so a run can be inspected
//! or drawn offline.

use nalgebra::Vector3;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use trailview_core::{ObstacleTable, ReplaySummary, StepOutcome};
use trailview_env::LocalPoint;

/// A single played frame.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame {
    /// Frame number, starting at 1
    pub frame: u64,

    /// Clock time in seconds
    pub time_sec: f64,

    pub segment_index: usize,
    pub position: LocalPoint,

    /// Rotation applied to the moving marker, degrees
    pub heading: f64,

    pub trail_len: usize,

    /// Follow camera position after this frame
    pub camera: [f64; 3],

    /// Obstacles revealed on this frame
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub revealed: Vec<usize>,
}

impl ReplayFrame {
    pub fn new(time_sec: f64, outcome: &StepOutcome, trail_len: usize, camera: Vector3<f64>) -> Self {
        Self {
            frame: outcome.step,
            time_sec,
            segment_index: outcome.segment_index,
            position: outcome.position,
            heading: outcome.heading,
            trail_len,
            camera: [camera.x, camera.y, camera.z],
            revealed: outcome.revealed.clone(),
        }
    }
}

/// Final state of one obstacle.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedObstacle {
    pub index: usize,
    pub position: LocalPoint,
    pub heading: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_cm: Option<f64>,
    pub revealed: bool,
}

/// Complete replay export.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayExport {
    /// Path log the run was loaded from
    pub source: String,

    pub tick_rate_hz: u32,

    /// Clock time of the last frame
    pub duration_sec: f64,

    pub frames: Vec<ReplayFrame>,

    pub obstacles: Vec<ExportedObstacle>,

    pub trail: Vec<LocalPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReplaySummary>,
}

impl ReplayExport {
    pub fn new(source: &str, tick_rate_hz: u32) -> Self {
        Self {
            source: source.to_string(),
            tick_rate_hz,
            duration_sec: 0.0,
            frames: Vec::new(),
            obstacles: Vec::new(),
            trail: Vec::new(),
            summary: None,
        }
    }

    pub fn add_frame(&mut self, frame: ReplayFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Records the final scene.
    pub fn finalize(&mut self, summary: ReplaySummary, obstacles: &ObstacleTable, trail: &[LocalPoint]) {
        self.obstacles = obstacles
            .markers()
            .iter()
            .enumerate()
            .map(|(index, m)| ExportedObstacle {
                index,
                position: m.position,
                heading: m.heading,
                range_cm: m.range_cm,
                revealed: m.is_revealed(),
            })
            .collect();
        self.trail = trail.to_vec();
        self.summary = Some(summary);
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
