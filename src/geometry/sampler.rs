//! Arc-length addressing along a projected path
//!
//! A fraction of `0.5` is the point halfway along the line by distance,
//! not the middle waypoint. Zero-length segments carry no geometry and
//! are skipped, so repeated waypoints never shift where a fraction lands.

use serde::Serialize;

use super::band::segment_normal;
use super::projection::{project, project_path, unproject};
use crate::domain::{GeoPoint, PlanarPoint};

/// A point on a path with the local line direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathSample {
    pub position: GeoPoint,
    /// Left-hand unit normal of the segment in projected space
    pub normal: PlanarPoint,
    /// Compass bearing of the segment, degrees clockwise from north in `[0, 360)`
    pub bearing: f64,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: PlanarPoint,
    end: PlanarPoint,
    dx: f64,
    dy: f64,
    length: f64,
    normal: PlanarPoint,
}

impl Segment {
    fn bearing(&self) -> f64 {
        self.dx.atan2(self.dy).to_degrees().rem_euclid(360.0)
    }
}

fn segments(path: &[GeoPoint]) -> Vec<Segment> {
    project_path(path)
        .windows(2)
        .filter_map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let length = dx.hypot(dy);

            (length > 0.0).then(|| Segment {
                start,
                end,
                dx,
                dy,
                length,
                normal: segment_normal(start, end),
            })
        })
        .collect()
}

/// Sample position, normal and bearing at a fraction of the path's length
///
/// `fraction` is clamped to `[0, 1]`. A path without any non-zero segment
/// yields its first point (the origin for an empty path) with a zero
/// normal and bearing 0.
pub fn sample_at(path: &[GeoPoint], fraction: f64) -> PathSample {
    let segments = segments(path);
    let Some(last) = segments.last() else {
        return PathSample {
            position: path.first().copied().unwrap_or(GeoPoint::new(0.0, 0.0)),
            normal: PlanarPoint::ZERO,
            bearing: 0.0,
        };
    };

    let total: f64 = segments.iter().map(|s| s.length).sum();
    let target = total * fraction.clamp(0.0, 1.0);
    let mut traversed = 0.0;

    for segment in &segments {
        if traversed + segment.length >= target {
            let ratio = (target - traversed) / segment.length;
            let point = PlanarPoint::new(
                segment.start.x + segment.dx * ratio,
                segment.start.y + segment.dy * ratio,
            );
            return PathSample {
                position: unproject(point),
                normal: segment.normal,
                bearing: segment.bearing(),
            };
        }
        traversed += segment.length;
    }

    // Floating point overrun past the final segment
    PathSample {
        position: unproject(last.end),
        normal: last.normal,
        bearing: last.bearing(),
    }
}

/// Sample the path, then push the point `depth` meters along the normal
///
/// Positive depth lies to the left of the direction of travel, negative
/// to the right. Normal and bearing are those of the base sample.
/// Zero depth or a zero normal returns the sample untouched.
pub fn offset_by_depth(path: &[GeoPoint], fraction: f64, depth: f64) -> PathSample {
    let base = sample_at(path, fraction);
    if depth == 0.0 || base.normal.is_zero() {
        return base;
    }
    let shifted = project(base.position).offset(base.normal, depth);

    PathSample {
        position: unproject(shifted),
        ..base
    }
}
