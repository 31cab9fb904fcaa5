//! Proximity reveal of obstacle markers.

use crate::tables::ObstacleTable;
use tracing::debug;
use trailview_env::LocalPoint;

/// Reveals every hidden obstacle strictly closer than `threshold` to
/// `marker_pos`.
///
/// Returns the newly revealed indices in ascending order. Already revealed
/// obstacles are never reported again and never hidden, so repeated calls
/// with the same position return an empty set.
pub fn reveal(marker_pos: LocalPoint, obstacles: &mut ObstacleTable, threshold: f64) -> Vec<usize> {
    let mut revealed = Vec::new();

    for (index, obstacle) in obstacles.markers_mut().iter_mut().enumerate() {
        if obstacle.is_revealed() {
            continue;
        }

        let distance = marker_pos.distance(&obstacle.position);
        if distance < threshold && obstacle.mark_revealed() {
            debug!("Obstacle {} revealed at distance {:.4}", index, distance);
            revealed.push(index);
        }
    }

    revealed
}

/// Threshold-carrying wrapper around [`reveal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRevealer {
    threshold: f64,
}

impl ProximityRevealer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn reveal(&self, marker_pos: LocalPoint, obstacles: &mut ObstacleTable) -> Vec<usize> {
        reveal(marker_pos, obstacles, self.threshold)
    }
}

impl Default for ProximityRevealer {
    fn default() -> Self {
        Self::new(0.05)
    }
}
