//! Geographic point (lat/lon, degrees).

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};

/// Geographic point in degrees.
///
/// `Coordinate::new` enforces the usual ranges. Points produced by projection
/// use [`Coordinate::from_raw`] since their longitude is not normalized and
/// may leave [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Create a coordinate without range checks
    pub const fn from_raw(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check the ranges of a coordinate built with `from_raw` or deserialized
    pub fn validate(&self) -> Result<()> {
        Self::new(self.lat, self.lon).map(|_| ())
    }

    pub fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    pub fn lon_radians(&self) -> f64 {
        self.lon.to_radians()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

// geo uses x = lon, y = lat
impl From<Coordinate> for Point<f64> {
    fn from(c: Coordinate) -> Self {
        Point::new(c.lon, c.lat)
    }
}
