//! Geometry types for landmarks and routes.

use crate::error::WaymarkError;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the coordinates fall inside the valid WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// The shape of a submission: a single point for a landmark, an ordered
/// path of at least two points for a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(GeoPoint),
    Path(Vec<GeoPoint>),
}

impl Geometry {
    /// Build a landmark geometry, validating the coordinate ranges.
    pub fn point(p: GeoPoint) -> Result<Self, WaymarkError> {
        if !p.is_valid() {
            return Err(WaymarkError::InvalidGeometry(format!(
                "coordinates out of range: ({}, {})",
                p.lat, p.lon
            )));
        }
        Ok(Self::Point(p))
    }

    /// Build a route geometry. Routes need at least two points.
    pub fn path(points: Vec<GeoPoint>) -> Result<Self, WaymarkError> {
        if points.len() < 2 {
            return Err(WaymarkError::InvalidGeometry(format!(
                "route needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(WaymarkError::InvalidGeometry(format!(
                "coordinates out of range: ({}, {})",
                bad.lat, bad.lon
            )));
        }
        Ok(Self::Path(points))
    }

    /// Number of points in this geometry.
    pub fn point_count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::Path(points) => points.len(),
        }
    }
}
