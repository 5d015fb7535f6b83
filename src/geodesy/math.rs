use crate::models::Coordinate;

/// Mean earth radius used by every calculation in the crate
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters (haversine).
pub fn distance(p1: &Coordinate, p2: &Coordinate) -> f64 {
    let lat1 = p1.lat_radians();
    let lat2 = p2.lat_radians();
    let half_dlat = (p2.lat - p1.lat).to_radians() / 2.0;
    let half_dlon = (p2.lon - p1.lon).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Destination reached from `center` after `radius_meters` along the
/// initial bearing `bearing` (radians, clockwise from north).
///
/// Longitude is not wrapped.
pub fn project_point(center: &Coordinate, radius_meters: f64, bearing: f64) -> Coordinate {
    let angular = radius_meters / EARTH_RADIUS_METERS;
    let lat = center.lat_radians();
    let lon = center.lon_radians();

    let new_lat = (lat.sin() * angular.cos() + lat.cos() * angular.sin() * bearing.cos()).asin();
    let new_lon = lon
        + (bearing.sin() * angular.sin() * lat.cos())
            .atan2(angular.cos() - lat.sin() * new_lat.sin());

    Coordinate::from_raw(new_lat.to_degrees(), new_lon.to_degrees())
}
