use crate::domain::GeoPoint;

/// Blend a front line between its start and target paths
///
/// Waypoints are paired by index. When the paths differ in length the
/// shorter one is padded with its own last point, so a waypoint never
/// borrows a position from the other path. An empty `target` holds every
/// start waypoint in place.
///
/// `progress` is clamped to `[0, 1]`. Coordinates are blended
/// independently, which is fine over the tens of kilometers a front
/// moves but is not a great-circle interpolation.
///
/// # Returns
/// `max(start.len(), target.len())` points, or nothing when `start` is empty
pub fn interpolate(start: &[GeoPoint], target: &[GeoPoint], progress: f64) -> Vec<GeoPoint> {
    let Some(&start_last) = start.last() else {
        return Vec::new();
    };

    let t = progress.clamp(0.0, 1.0);
    let len = start.len().max(target.len());

    (0..len)
        .map(|i| {
            let from = start.get(i).copied().unwrap_or(start_last);
            let to = target
                .get(i)
                .or_else(|| target.last())
                .copied()
                .unwrap_or(from);

            GeoPoint::new(
                lerp(from.latitude, to.latitude, t),
                lerp(from.longitude, to.longitude, t),
            )
        })
        .collect()
}

/// Exact at both ends, unlike `a + (b - a) * t`
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Vec<GeoPoint> {
        vec![GeoPoint::new(52.0, 23.0), GeoPoint::new(51.5, 23.5)]
    }

    fn target() -> Vec<GeoPoint> {
        vec![GeoPoint::new(52.1, 23.4), GeoPoint::new(51.6, 23.9)]
    }

    #[test]
    fn test_empty_start() {
        assert!(interpolate(&[], &target(), 0.5).is_empty());
    }

    #[test]
    fn test_endpoints_are_identity() {
        assert_eq!(interpolate(&start(), &target(), 0.0), start());
        assert_eq!(interpolate(&start(), &target(), 1.0), target());
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(
            interpolate(&start(), &target(), -5.0),
            interpolate(&start(), &target(), 0.0)
        );
        assert_eq!(
            interpolate(&start(), &target(), 5.0),
            interpolate(&start(), &target(), 1.0)
        );
    }

    #[test]
    fn test_midpoint() {
        let path = interpolate(&start(), &target(), 0.5);
        assert!((path[0].latitude - 52.05).abs() < 1e-12);
        assert!((path[0].longitude - 23.2).abs() < 1e-12);
        assert!((path[1].latitude - 51.55).abs() < 1e-12);
        assert!((path[1].longitude - 23.7).abs() < 1e-12);
    }

    #[test]
    fn test_shorter_target_pads_with_own_last_point() {
        let c = GeoPoint::new(51.0, 24.0);
        let mut start = start();
        start.push(c);
        let target = vec![GeoPoint::new(60.0, 30.0), GeoPoint::new(61.0, 31.0)];

        for progress in [0.0, 0.3, 1.0] {
            let path = interpolate(&start, &target, progress);
            assert_eq!(path.len(), 3);
            let expected = GeoPoint::new(
                c.latitude + (61.0 - c.latitude) * progress,
                c.longitude + (31.0 - c.longitude) * progress,
            );
            assert!((path[2].latitude - expected.latitude).abs() < 1e-12);
            assert!((path[2].longitude - expected.longitude).abs() < 1e-12);
        }
    }

    #[test]
    fn test_longer_target_pads_start() {
        let mut target = target();
        target.push(GeoPoint::new(51.0, 24.5));

        let path = interpolate(&start(), &target, 1.0);
        assert_eq!(path.len(), 3);
        assert_eq!(path[2], GeoPoint::new(51.0, 24.5));

        let path = interpolate(&start(), &target, 0.0);
        assert_eq!(path[2], start()[1]);
    }

    #[test]
    fn test_empty_target_holds_start() {
        assert_eq!(interpolate(&start(), &[], 0.7), start());
    }
}
