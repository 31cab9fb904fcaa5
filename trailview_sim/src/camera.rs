//! Smoothing follow camera.

use nalgebra::Vector3;
use trailview_env::{CameraRig, LocalPoint, MarkerHandle};

/// Camera that eases toward a followed marker.
///
/// Each `update` moves the camera a fixed fraction of the way to
/// `target + offset`:
///
/// ```text
/// position = lerp(position, target + offset, smoothing)
/// ```
#[derive(Debug, Clone)]
pub struct FollowCamera {
    target: Option<MarkerHandle>,
    offset: Vector3<f64>,
    smoothing: f64,
    position: Vector3<f64>,
}

impl FollowCamera {
    pub fn new(offset: Vector3<f64>, smoothing: f64) -> Self {
        Self {
            target: None,
            offset,
            smoothing: smoothing.clamp(0.0, 1.0),
            position: offset,
        }
    }

    pub fn target(&self) -> Option<MarkerHandle> {
        self.target
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Eases toward the followed marker, now at `target_position`.
    pub fn update(&mut self, target_position: LocalPoint) -> Vector3<f64> {
        let desired = Vector3::new(target_position.x, target_position.y, 0.0) + self.offset;
        self.position = self.position.lerp(&desired, self.smoothing);
        self.position
    }
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, -10.0), 0.125)
    }
}

impl CameraRig for FollowCamera {
    fn set_follow_target(&mut self, target: MarkerHandle) {
        self.target = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_follow_target() {
        let mut camera = FollowCamera::default();
        assert!(camera.target().is_none());
        camera.set_follow_target(MarkerHandle(0));
        assert_eq!(camera.target(), Some(MarkerHandle(0)));
    }

    #[test]
    fn test_update_moves_fraction() {
        let mut camera = FollowCamera::new(Vector3::new(0.0, 0.0, -10.0), 0.5);
        let pos = camera.update(LocalPoint::new(8.0, 4.0));
        assert_relative_eq!(pos.x, 4.0);
        assert_relative_eq!(pos.y, 2.0);
        assert_relative_eq!(pos.z, -10.0);
    }

    #[test]
    fn test_converges_on_stationary_target() {
        let mut camera = FollowCamera::default();
        let target = LocalPoint::new(100.0, -20.0);
        for _ in 0..200 {
            camera.update(target);
        }
        assert_relative_eq!(camera.position().x, 100.0, epsilon = 1e-6);
        assert_relative_eq!(camera.position().y, -20.0, epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn prop_never_moves_away_from_target(
            tx in -1e4f64..1e4,
            ty in -1e4f64..1e4,
            smoothing in 0.0f64..=1.0,
        ) {
            let mut camera = FollowCamera::new(Vector3::new(0.0, 0.0, -10.0), smoothing);
            let target = LocalPoint::new(tx, ty);
            let desired = Vector3::new(tx, ty, -10.0);

            let mut last = (camera.position() - desired).norm();
            for _ in 0..10 {
                let now = (camera.update(target) - desired).norm();
                prop_assert!(now <= last + 1e-9);
                last = now;
            }
        }
    }
}
