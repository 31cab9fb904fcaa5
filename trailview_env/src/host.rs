//! Rendering host and camera abstractions.

use crate::error::EnvError;
use crate::types::{LocalPoint, MarkerHandle, MarkerScale};

/// Callbacks the replay engine consumes from the rendering host.
///
/// The host owns every drawable object; the engine only holds opaque
/// `MarkerHandle`s. All methods take `&mut self`: the host is driven from a
/// single frame loop and is never shared across threads by the engine.
///
/// # Marker lifecycle
///
/// ```text
/// spawn_moving_marker() ──► set_scale ──► (per frame) set_position / set_rotation
/// spawn_static_marker() ──► hidden ──► set_visible(true) on reveal
/// ```
pub trait RenderHost {
    /// Spawns the marker that travels along the path.
    fn spawn_moving_marker(&mut self) -> Result<MarkerHandle, EnvError>;

    /// Moves a marker to a local-frame position.
    fn set_position(&mut self, handle: MarkerHandle, position: LocalPoint) -> Result<(), EnvError>;

    /// Sets a marker's rotation about the view axis, in degrees.
    fn set_rotation(&mut self, handle: MarkerHandle, degrees: f64) -> Result<(), EnvError>;

    /// Sets a marker's scale.
    fn set_scale(&mut self, handle: MarkerHandle, scale: MarkerScale) -> Result<(), EnvError>;

    /// Appends one point to the drawn trail polyline.
    fn append_trail_point(&mut self, point: LocalPoint) -> Result<(), EnvError>;

    /// Spawns a static marker at `position` rotated by `heading_degrees`.
    ///
    /// Static markers start hidden.
    fn spawn_static_marker(
        &mut self,
        position: LocalPoint,
        heading_degrees: f64,
    ) -> Result<MarkerHandle, EnvError>;

    /// Shows or hides a marker.
    fn set_visible(&mut self, handle: MarkerHandle, visible: bool) -> Result<(), EnvError>;

    /// Returns the duration of the current frame in seconds.
    fn elapsed_frame_time(&self) -> f64;
}

/// Camera collaborator.
///
/// The engine calls `set_follow_target` once after spawning the moving
/// marker. How the camera approaches its target is up to the implementation.
pub trait CameraRig {
    /// Starts following the given marker.
    fn set_follow_target(&mut self, target: MarkerHandle);
}
