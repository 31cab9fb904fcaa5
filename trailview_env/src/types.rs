//! Common types shared by the engine and its hosts.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A position in the local planar frame.
///
/// Produced by converting a geodetic point relative to a reference origin;
/// `x` grows with longitude and `y` with latitude.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    /// Creates a point from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The local frame origin.
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &LocalPoint) -> f64 {
        (Vector2::from(*self) - Vector2::from(*other)).norm()
    }

    /// Linear interpolation from `start` to `end` at parameter `t`.
    pub fn lerp(start: &LocalPoint, end: &LocalPoint, t: f64) -> LocalPoint {
        Vector2::from(*start).lerp(&Vector2::from(*end), t).into()
    }
}

impl From<LocalPoint> for Vector2<f64> {
    fn from(p: LocalPoint) -> Self {
        Vector2::new(p.x, p.y)
    }
}

impl From<Vector2<f64>> for LocalPoint {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl std::fmt::Display for LocalPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Opaque identifier for a drawable object owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

impl MarkerHandle {
    /// Returns the raw id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Per-axis scale applied to a marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerScale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MarkerScale {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn uniform(s: f64) -> Self {
        Self { x: s, y: s, z: s }
    }
}

impl Default for MarkerScale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl From<[f64; 3]> for MarkerScale {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}
