use geo::{Distance, Haversine, Point};

use crate::domain::GeoPoint;

fn to_point(p: GeoPoint) -> Point<f64> {
    Point::new(p.longitude, p.latitude)
}

/// Great-circle distance in meters between two points
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    Haversine::distance(to_point(a), to_point(b))
}

/// Ground length of a path in meters (0 for fewer than 2 points)
pub fn path_length_meters(path: &[GeoPoint]) -> f64 {
    path.windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}

/// Format a distance the way the map ruler shows it
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_one_degree_latitude() {
        let d = distance_meters(GeoPoint::new(52.0, 23.0), GeoPoint::new(53.0, 23.0));
        // ~111.2 km on the mean-radius sphere
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_path_length() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let c = GeoPoint::new(0.0, 2.0);

        assert_eq!(path_length_meters(&[a]), 0.0);
        assert!((path_length_meters(&[a, b, c]) - 2.0 * distance_meters(a, b)).abs() < 1e-6);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(12_345.0), "12.3 km");
    }
}
