/// Spherical Web Mercator (EPSG:3857) between WGS84 and planar meters
///
/// Same projection the tile layers use, so offsets computed here line up
/// with what the map widget draws:
/// - x = R * lon
/// - y = R * ln(tan(pi/4 + lat/2))
///
/// Distances are true meters only at the equator; at latitude `phi`
/// one projected meter covers `cos(phi)` meters on the ground.
use std::f64::consts::FRAC_PI_2;

use crate::domain::{GeoPoint, PlanarPoint};

/// Sphere radius used by EPSG:3857
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which the projection becomes square
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Project a lat/lon point to Web-Mercator meters
pub fn project(point: GeoPoint) -> PlanarPoint {
    let lat = point.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = lat.to_radians().sin();

    PlanarPoint::new(
        EARTH_RADIUS * point.longitude.to_radians(),
        EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0,
    )
}

/// Inverse of [`project`]
pub fn unproject(point: PlanarPoint) -> GeoPoint {
    GeoPoint::new(
        (2.0 * (point.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
        (point.x / EARTH_RADIUS).to_degrees(),
    )
}

/// Project a slice of lat/lon points
pub fn project_path(points: &[GeoPoint]) -> Vec<PlanarPoint> {
    points.iter().map(|&p| project(p)).collect()
}
