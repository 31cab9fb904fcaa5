//! Recording render host.

use trailview_env::{EnvError, LocalPoint, MarkerHandle, MarkerScale, RenderHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// The marker that travels the path
    Moving,
    /// An obstacle marker, placed once
    Static,
}

/// Last known transform and visibility of a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerState {
    pub kind: MarkerKind,
    pub position: LocalPoint,
    pub rotation: f64,
    pub scale: MarkerScale,
    pub visible: bool,
}

/// A `RenderHost` with no renderer behind it.
///
/// Keeps the scene in memory so a run can be inspected or exported. The frame
/// time is whatever the driver last set.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    markers: Vec<MarkerState>,
    trail: Vec<LocalPoint>,
    frame_time: f64,
}

impl RecordingHost {
    pub fn new(frame_time: f64) -> Self {
        Self {
            markers: Vec::new(),
            trail: Vec::new(),
            frame_time,
        }
    }

    pub fn set_frame_time(&mut self, seconds: f64) {
        self.frame_time = seconds;
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerState> {
        self.markers.get(handle.0 as usize)
    }

    pub fn markers(&self) -> &[MarkerState] {
        &self.markers
    }

    pub fn trail(&self) -> &[LocalPoint] {
        &self.trail
    }

    pub fn visible_static_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|m| m.kind == MarkerKind::Static && m.visible)
            .count()
    }

    fn spawn(&mut self, state: MarkerState) -> MarkerHandle {
        let handle = MarkerHandle(self.markers.len() as u64);
        self.markers.push(state);
        handle
    }

    fn marker_mut(&mut self, handle: MarkerHandle) -> Result<&mut MarkerState, EnvError> {
        self.markers
            .get_mut(handle.0 as usize)
            .ok_or(EnvError::UnknownHandle(handle))
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

impl RenderHost for RecordingHost {
    fn spawn_moving_marker(&mut self) -> Result<MarkerHandle, EnvError> {
        Ok(self.spawn(MarkerState {
            kind: MarkerKind::Moving,
            position: LocalPoint::origin(),
            rotation: 0.0,
            scale: MarkerScale::default(),
            visible: true,
        }))
    }

    fn set_position(&mut self, handle: MarkerHandle, position: LocalPoint) -> Result<(), EnvError> {
        self.marker_mut(handle)?.position = position;
        Ok(())
    }

    fn set_rotation(&mut self, handle: MarkerHandle, degrees: f64) -> Result<(), EnvError> {
        self.marker_mut(handle)?.rotation = degrees;
        Ok(())
    }

    fn set_scale(&mut self, handle: MarkerHandle, scale: MarkerScale) -> Result<(), EnvError> {
        self.marker_mut(handle)?.scale = scale;
        Ok(())
    }

    fn append_trail_point(&mut self, point: LocalPoint) -> Result<(), EnvError> {
        self.trail.push(point);
        Ok(())
    }

    fn spawn_static_marker(
        &mut self,
        position: LocalPoint,
        heading_degrees: f64,
    ) -> Result<MarkerHandle, EnvError> {
        Ok(self.spawn(MarkerState {
            kind: MarkerKind::Static,
            position,
            rotation: heading_degrees,
            scale: MarkerScale::default(),
            visible: false,
        }))
    }

    fn set_visible(&mut self, handle: MarkerHandle, visible: bool) -> Result<(), EnvError> {
        self.marker_mut(handle)?.visible = visible;
        Ok(())
    }

    fn elapsed_frame_time(&self) -> f64 {
        self.frame_time
    }
}
