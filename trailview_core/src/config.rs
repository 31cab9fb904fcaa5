//! Replay configuration.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use trailview_env::MarkerScale;

/// Tunables for loading and playing back a recorded session.
///
/// Every field has a default, so a JSON override file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Degrees to local units (default: 1e5)
    pub scale: f64,

    /// Segment progress per second of frame time (default: 5.0)
    pub speed: f64,

    /// Reveal distance in local units, strict (default: 0.05)
    pub proximity_threshold: f64,

    /// Minimum fields for a path row: lat, lon, heading (default: 3)
    pub path_min_fields: usize,

    /// Minimum fields for an obstacle row: lat, lon, heading, range (default: 4)
    pub obstacle_min_fields: usize,

    /// Scale of the moving marker (default: [2.5, 2.5, 1.0])
    pub marker_scale: [f64; 3],

    /// Scale of each obstacle marker (default: [0.4, 0.4, 1.0])
    pub obstacle_marker_scale: [f64; 3],
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            scale: 1e5,
            speed: 5.0,
            proximity_threshold: 0.05,
            path_min_fields: 3,
            obstacle_min_fields: 4,
            marker_scale: [2.5, 2.5, 1.0],
            obstacle_marker_scale: [0.4, 0.4, 1.0],
        }
    }
}

impl ReplayConfig {
    /// Parses a JSON override document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON override file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would make conversion or playback meaningless.
    pub fn validate(&self) -> Result<(), LoadError> {
        let positive = [
            ("scale", self.scale),
            ("speed", self.speed),
            ("proximity_threshold", self.proximity_threshold),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LoadError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }

        // lat, lon and heading are always read
        if self.path_min_fields < 3 || self.obstacle_min_fields < 3 {
            return Err(LoadError::InvalidConfig(
                "rows need at least 3 fields (latitude, longitude, heading)".to_string(),
            ));
        }

        Ok(())
    }

    pub fn marker_scale(&self) -> MarkerScale {
        self.marker_scale.into()
    }

    pub fn obstacle_marker_scale(&self) -> MarkerScale {
        self.obstacle_marker_scale.into()
    }
}
