//! Spatial index for fast marker lookups.

use geo::Point;
use hashbrown::HashSet;
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::{debug, info};

use crate::geodesy::EARTH_RADIUS_METERS;
use crate::models::{Coordinate, JurisdictionMarker};

/// Longitude band used for caps that reach a pole. Wide enough for any
/// unwrapped sample longitude.
const FULL_LON_BAND: (f64, f64) = (-720.0, 720.0);

/// Slack added to every envelope so points sitting exactly on a marker's
/// edge are never pruned by rounding.
const ENVELOPE_MARGIN_DEGREES: f64 = 1e-7;

/// Wrapper for R-tree indexing of markers
#[derive(Clone)]
struct IndexedMarker {
    slot: usize,
    marker: Arc<JurisdictionMarker>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedMarker {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedMarker {
    fn new(slot: usize, marker: JurisdictionMarker) -> Self {
        let envelope = marker_envelope(&marker);
        Self {
            slot,
            marker: Arc::new(marker),
            envelope,
        }
    }
}

/// Lon/lat box enclosing every point within `radius_meters` of the center.
fn marker_envelope(marker: &JurisdictionMarker) -> AABB<[f64; 2]> {
    let angular = marker.radius_meters / EARTH_RADIUS_METERS;
    let lat = marker.center.lat;
    let lon = marker.center.lon;
    let dlat = angular.to_degrees() + ENVELOPE_MARGIN_DEGREES;

    let min_lat = lat - dlat;
    let max_lat = lat + dlat;

    // Cap contains a pole: every longitude is reachable
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return AABB::from_corners(
            [FULL_LON_BAND.0, min_lat.max(-90.0)],
            [FULL_LON_BAND.1, max_lat.min(90.0)],
        );
    }

    let ratio = angular.sin() / lat.to_radians().cos();
    if ratio >= 1.0 {
        return AABB::from_corners([FULL_LON_BAND.0, min_lat], [FULL_LON_BAND.1, max_lat]);
    }
    let dlon = ratio.asin().to_degrees() + ENVELOPE_MARGIN_DEGREES;

    AABB::from_corners([lon - dlon, min_lat], [lon + dlon, max_lat])
}

/// R-tree over jurisdiction markers.
///
/// Candidates come from envelope intersection and are confirmed with the
/// haversine test, so answers match a linear scan over the same markers.
pub struct JurisdictionIndex {
    tree: RTree<IndexedMarker>,
    markers: Vec<Arc<JurisdictionMarker>>,
}

impl JurisdictionIndex {
    /// Build spatial index from markers
    pub fn build(markers: Vec<JurisdictionMarker>) -> Self {
        info!("Building spatial index for {} markers...", markers.len());

        let indexed: Vec<IndexedMarker> = markers
            .into_iter()
            .enumerate()
            .map(|(slot, marker)| IndexedMarker::new(slot, marker))
            .collect();
        let markers = indexed.iter().map(|im| Arc::clone(&im.marker)).collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} entries", tree.size());

        Self { tree, markers }
    }

    /// Candidates whose envelope holds `point`, also trying the point
    /// shifted by a full turn so unwrapped longitudes still match.
    fn candidates<'a>(&'a self, point: &Coordinate) -> impl Iterator<Item = &'a IndexedMarker> {
        let query = Point::from(*point);
        [0.0, -360.0, 360.0].into_iter().flat_map(move |shift| {
            let query_envelope = AABB::from_point([query.x() + shift, query.y()]);
            self.tree.locate_in_envelope_intersecting(&query_envelope)
        })
    }

    /// Whether any marker contains `point`
    pub fn covers(&self, point: &Coordinate) -> bool {
        self.candidates(point).any(|im| im.marker.contains(point))
    }

    /// All markers containing `point`, in insertion order
    pub fn markers_containing(&self, point: &Coordinate) -> Vec<Arc<JurisdictionMarker>> {
        let mut seen = HashSet::new();
        let mut slots: Vec<usize> = self
            .candidates(point)
            .filter(|im| seen.insert(im.slot))
            .filter(|im| im.marker.contains(point))
            .map(|im| im.slot)
            .collect();
        slots.sort_unstable();

        debug!("Marker lookup at {}: {} hits", point, slots.len());

        slots
            .into_iter()
            .map(|slot| Arc::clone(&self.markers[slot]))
            .collect()
    }

    /// Get total number of indexed markers
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
