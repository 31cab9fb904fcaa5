//! Rerun visualization for replay runs.
//!
//! Visualization is optional and only available with the `visualization`
//! feature.
//!
//! # What Gets Logged
//!
//! - The trail as a 2D line strip
//! - The moving marker as a point
//! - Revealed obstacles as arrows along their logged heading
//! - Frame time on the `replay_time` timeline

#[cfg(feature = "visualization")]
use rerun::{Arrows2D, Color, LineStrips2D, Points2D, Radius, RecordingStream};
use trailview_core::ObstacleMarker;
use trailview_env::LocalPoint;

/// Rerun logger for replay visualization.
pub struct RerunLogger {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunLogger {
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Spawns a viewer and connects to it.
    #[cfg(feature = "visualization")]
    pub fn new(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun visualization enabled");
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self::disabled()
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn new(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "visualization")]
    pub fn set_time(&self, seconds: f64) {
        if let Some(ref rec) = self.rec {
            rec.set_time_seconds("replay_time", seconds);
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn set_time(&self, _seconds: f64) {}

    #[cfg(feature = "visualization")]
    pub fn log_trail(&self, trail: &[LocalPoint]) {
        if let Some(ref rec) = self.rec {
            let strip: Vec<[f32; 2]> = trail.iter().map(|p| [p.x as f32, p.y as f32]).collect();
            let _ = rec.log(
                "replay/trail",
                &LineStrips2D::new([strip]).with_colors([Color::from_rgb(0, 255, 0)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_trail(&self, _trail: &[LocalPoint]) {}

    #[cfg(feature = "visualization")]
    pub fn log_marker(&self, position: LocalPoint) {
        if let Some(ref rec) = self.rec {
            let _ = rec.log(
                "replay/marker",
                &Points2D::new([[position.x as f32, position.y as f32]])
                    .with_colors([Color::from_rgb(255, 100, 100)])
                    .with_radii([Radius::new_scene_units(2.5)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_marker(&self, _position: LocalPoint) {}

    /// Logs every revealed obstacle. Hidden ones are left out.
    #[cfg(feature = "visualization")]
    pub fn log_obstacles(&self, obstacles: &[ObstacleMarker]) {
        if let Some(ref rec) = self.rec {
            let revealed: Vec<&ObstacleMarker> = obstacles.iter().filter(|m| m.is_revealed()).collect();
            let origins: Vec<[f32; 2]> = revealed
                .iter()
                .map(|m| [m.position.x as f32, m.position.y as f32])
                .collect();
            let vectors: Vec<[f32; 2]> = revealed
                .iter()
                .map(|m| {
                    let rad = m.heading.to_radians();
                    [rad.cos() as f32, rad.sin() as f32]
                })
                .collect();

            let _ = rec.log(
                "replay/obstacles",
                &Arrows2D::from_vectors(vectors)
                    .with_origins(origins)
                    .with_colors([Color::from_rgb(255, 165, 0)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_obstacles(&self, _obstacles: &[ObstacleMarker]) {}
}
