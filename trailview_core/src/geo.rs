//! The "GEO" layer - geodetic to local planar conversion
//!
//! Positions are expressed relative to a reference origin (the first valid
//! fix of the path log) using a fixed linear scale:
//!
//! ```text
//! x = (lon - origin.lon) * scale
//! y = (lat - origin.lat) * scale
//! ```
//!
//! No map projection is applied. At the default scale of 1e5 one local unit
//! is roughly a metre of northing near the equator; eastings shrink with
//! latitude. Both tables go through the same mapping, so proximity tests
//! stay consistent.

use crate::error::GeoError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use trailview_env::LocalPoint;

/// A raw geodetic fix, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    fn non_finite(&self) -> GeoError {
        GeoError::NonFinite {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// The anchor of the local frame.
///
/// Always finite. Established once per load session and shared by the path
/// and obstacle tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceOrigin(GeoPoint);

impl ReferenceOrigin {
    pub fn new(point: GeoPoint) -> Result<Self, GeoError> {
        if !point.is_finite() {
            return Err(point.non_finite());
        }
        Ok(Self(point))
    }

    pub fn point(&self) -> GeoPoint {
        self.0
    }
}

/// Converts `point` into the local frame anchored at `origin`.
///
/// Pure: the same inputs always give the same output.
pub fn convert(origin: &ReferenceOrigin, scale: f64, point: &GeoPoint) -> Result<LocalPoint, GeoError> {
    if !point.is_finite() {
        return Err(point.non_finite());
    }

    let o = origin.point();
    let offset = Vector2::new(point.longitude - o.longitude, point.latitude - o.latitude);
    Ok((offset * scale).into())
}

/// An origin and scale bundled for repeated conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConverter {
    origin: ReferenceOrigin,
    scale: f64,
}

impl CoordinateConverter {
    pub fn new(origin: ReferenceOrigin, scale: f64) -> Self {
        Self { origin, scale }
    }

    pub fn convert(&self, point: &GeoPoint) -> Result<LocalPoint, GeoError> {
        convert(&self.origin, self.scale, point)
    }

    pub fn origin(&self) -> ReferenceOrigin {
        self.origin
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
