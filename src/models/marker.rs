//! Circular jurisdiction zones.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::error::{GeoError, Result};

/// One circular zone of a jurisdiction.
///
/// A jurisdiction is the union of all of its markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarkerRecord", into = "MarkerRecord")]
pub struct JurisdictionMarker {
    pub center: Coordinate,
    pub radius_meters: f64,
    /// Free-form classification from the authority directory (e.g. "city")
    pub kind: Option<String>,
}

impl JurisdictionMarker {
    pub fn new(center: Coordinate, radius_meters: f64) -> Result<Self> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(GeoError::InvalidRadius(radius_meters));
        }
        Ok(Self {
            center,
            radius_meters,
            kind: None,
        })
    }

    /// Whether `point` lies inside or on the edge of this zone
    pub fn contains(&self, point: &Coordinate) -> bool {
        crate::geodesy::distance(point, &self.center) <= self.radius_meters
    }
}

/// Flat wire shape: `{ latitude, longitude, radius_meters, kind }`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MarkerRecord {
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

impl TryFrom<MarkerRecord> for JurisdictionMarker {
    type Error = GeoError;

    fn try_from(record: MarkerRecord) -> Result<Self> {
        let center = Coordinate::new(record.latitude, record.longitude)?;
        let mut marker = JurisdictionMarker::new(center, record.radius_meters)?;
        marker.kind = record.kind;
        Ok(marker)
    }
}

impl From<JurisdictionMarker> for MarkerRecord {
    fn from(marker: JurisdictionMarker) -> Self {
        Self {
            latitude: marker.center.lat,
            longitude: marker.center.lon,
            radius_meters: marker.radius_meters,
            kind: marker.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_radius_rejected() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        assert_eq!(
            JurisdictionMarker::new(center, -1.0),
            Err(GeoError::InvalidRadius(-1.0))
        );
        assert!(JurisdictionMarker::new(center, f64::NAN).is_err());
        assert!(JurisdictionMarker::new(center, 0.0).is_ok());
    }

    #[test]
    fn test_contains_edge() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        let marker = JurisdictionMarker::new(center, 0.0).unwrap();
        assert!(marker.contains(&center));
        assert!(!marker.contains(&Coordinate::new(0.0, 0.001).unwrap()));
    }

    #[test]
    fn test_deserialize_flat_record() {
        let json = r#"{"latitude": 48.1, "longitude": 11.5, "radius_meters": 2500, "kind": "city"}"#;
        let marker: JurisdictionMarker = serde_json::from_str(json).unwrap();
        assert_eq!(marker.center, Coordinate::new(48.1, 11.5).unwrap());
        assert_eq!(marker.radius_meters, 2500.0);
        assert_eq!(marker.kind.as_deref(), Some("city"));

        let back = serde_json::to_value(&marker).unwrap();
        assert_eq!(back["latitude"], 48.1);
        assert_eq!(back["kind"], "city");
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let json = r#"{"latitude": 95.0, "longitude": 11.5, "radius_meters": 10}"#;
        assert!(serde_json::from_str::<JurisdictionMarker>(json).is_err());

        let json = r#"{"latitude": 45.0, "longitude": 11.5, "radius_meters": -10}"#;
        assert!(serde_json::from_str::<JurisdictionMarker>(json).is_err());
    }
}
