use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees (WGS84)
///
/// Serialized as `{ "lat": .., "lng": .. }` to match what map widgets
/// consume; `latitude`/`longitude`/`lon` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "lng", alias = "longitude", alias = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A point (or vector) in projected Web-Mercator meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const ZERO: PlanarPoint = PlanarPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Translate by `direction * distance`
    pub fn offset(&self, direction: PlanarPoint, distance: f64) -> PlanarPoint {
        PlanarPoint::new(self.x + direction.x * distance, self.y + direction.y * distance)
    }
}
