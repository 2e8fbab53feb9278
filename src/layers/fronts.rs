use serde::Serialize;

use crate::domain::{Front, GeoPoint};
use crate::geometry::{build_band, interpolate, offset_by_depth};

/// A front with its renderable shapes for the current tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontGeometry {
    #[serde(flatten)]
    pub front: Front,
    /// Current line, interpolated by progress
    pub path: Vec<GeoPoint>,
    /// Band polygon around `path`, `None` when the path is a single point
    pub band: Option<Vec<GeoPoint>>,
    /// Midpoint of the line by arc length
    pub label_position: GeoPoint,
    /// Line direction at the label
    pub bearing: f64,
}

impl FrontGeometry {
    /// Whether the path is long enough to place divisions on
    pub fn has_line(&self) -> bool {
        self.path.len() >= 2
    }
}

/// Compute the current line, band and label anchor for a front
pub fn build_front_geometry(front: &Front) -> FrontGeometry {
    let path = interpolate(&front.start_path, &front.advance_path, front.progress);
    let band = build_band(&path, front.width);
    let label = offset_by_depth(&path, 0.5, 0.0);

    FrontGeometry {
        front: front.clone(),
        path,
        band,
        label_position: label.position,
        bearing: label.bearing,
    }
}

pub fn build_front_geometries(fronts: &[Front]) -> Vec<FrontGeometry> {
    fronts.iter().map(build_front_geometry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{project, sample_at};

    fn front() -> Front {
        Front::new(
            "center",
            vec![GeoPoint::new(52.0, 23.0), GeoPoint::new(51.5, 23.5)],
            vec![GeoPoint::new(52.1, 23.4), GeoPoint::new(51.6, 23.9)],
        )
        .with_progress(0.5)
        .with_width(20000.0)
    }

    #[test]
    fn test_front_geometry_midpoint_path() {
        let geometry = build_front_geometry(&front());

        let expected = [GeoPoint::new(52.05, 23.2), GeoPoint::new(51.55, 23.7)];
        assert_eq!(geometry.path.len(), 2);
        for (actual, expected) in geometry.path.iter().zip(expected) {
            assert!((actual.latitude - expected.latitude).abs() < 1e-9);
            assert!((actual.longitude - expected.longitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_front_band_straddles_path() {
        let geometry = build_front_geometry(&front());
        let band = geometry.band.as_ref().unwrap();
        assert_eq!(band.len(), 4);

        // Upper vertex i pairs with lower vertex 3 - i across the path
        for i in 0..2 {
            let upper = project(band[i]);
            let lower = project(band[3 - i]);
            let center = project(geometry.path[i]);

            let width = (upper.x - lower.x).hypot(upper.y - lower.y);
            assert!((width - 20000.0).abs() < 0.01, "width {width}");

            let mid_x = (upper.x + lower.x) / 2.0;
            let mid_y = (upper.y + lower.y) / 2.0;
            assert!((mid_x - center.x).abs() < 0.01);
            assert!((mid_y - center.y).abs() < 0.01);
        }
    }

    #[test]
    fn test_front_label_at_midpoint() {
        let geometry = build_front_geometry(&front());
        let mid = sample_at(&geometry.path, 0.5);

        assert!((geometry.label_position.latitude - mid.position.latitude).abs() < 1e-9);
        assert!((geometry.label_position.longitude - mid.position.longitude).abs() < 1e-9);
        assert_eq!(geometry.bearing, mid.bearing);
        // Running south-east
        assert!(geometry.bearing > 90.0 && geometry.bearing < 180.0);
    }

    #[test]
    fn test_front_single_point_has_no_band() {
        let front = Front::new("dot", vec![GeoPoint::new(50.0, 20.0)], Vec::new());
        let geometry = build_front_geometry(&front);

        assert_eq!(geometry.path, vec![GeoPoint::new(50.0, 20.0)]);
        assert!(geometry.band.is_none());
        assert!(!geometry.has_line());
        assert_eq!(geometry.label_position, GeoPoint::new(50.0, 20.0));
        assert_eq!(geometry.bearing, 0.0);
    }

    #[test]
    fn test_build_front_geometries_keeps_order() {
        let mut second = front();
        second.id = "south".to_string();
        let geometries = build_front_geometries(&[front(), second]);

        let ids: Vec<_> = geometries.iter().map(|g| g.front.id.as_str()).collect();
        assert_eq!(ids, ["center", "south"]);
    }
}
