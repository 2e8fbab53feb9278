use super::projection::{project_path, unproject};
use crate::domain::{GeoPoint, PlanarPoint};

/// Outline a path as a ribbon polygon of the given width
///
/// Each vertex is pushed out along the normalized sum of the normals of
/// the segments it touches (a miter join), half the width to either side.
/// Hairpin turns can make the outline self-intersect; that is accepted.
///
/// # Arguments
/// * `path` - Front line in lat/lon
/// * `width` - Ribbon width in projected meters
///
/// # Returns
/// The upper row followed by the reversed lower row (`2 * path.len()`
/// points, ring closed implicitly), or `None` for fewer than 2 points
pub fn build_band(path: &[GeoPoint], width: f64) -> Option<Vec<GeoPoint>> {
    if path.len() < 2 {
        return None;
    }

    let projected = project_path(path);
    let offsets = vertex_offsets(&projected, width / 2.0);

    let upper = projected
        .iter()
        .zip(&offsets)
        .map(|(p, o)| unproject(PlanarPoint::new(p.x + o.x, p.y + o.y)));

    let lower: Vec<GeoPoint> = projected
        .iter()
        .zip(&offsets)
        .map(|(p, o)| unproject(PlanarPoint::new(p.x - o.x, p.y - o.y)))
        .collect();

    Some(upper.chain(lower.into_iter().rev()).collect())
}

/// Offset vector (already scaled to `half_width`) for every vertex
///
/// A vertex whose segments are all zero-length gets a zero offset, so the
/// band pinches onto the path there.
fn vertex_offsets(points: &[PlanarPoint], half_width: f64) -> Vec<PlanarPoint> {
    let mut normals = vec![PlanarPoint::ZERO; points.len()];

    for (i, pair) in points.windows(2).enumerate() {
        let normal = segment_normal(pair[0], pair[1]);
        for vertex in [i, i + 1] {
            normals[vertex].x += normal.x;
            normals[vertex].y += normal.y;
        }
    }

    normals
        .into_iter()
        .map(|n| {
            let unit = normalize(n);
            PlanarPoint::new(unit.x * half_width, unit.y * half_width)
        })
        .collect()
}

/// Left-hand unit normal `(-dy, dx)` of a segment, zero when it has no length
pub(crate) fn segment_normal(from: PlanarPoint, to: PlanarPoint) -> PlanarPoint {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    normalize(PlanarPoint::new(-dy, dx))
}

/// Normalize a 2D vector
fn normalize(v: PlanarPoint) -> PlanarPoint {
    let len = v.length();
    if len > 0.0 {
        PlanarPoint::new(v.x / len, v.y / len)
    } else {
        PlanarPoint::ZERO
    }
}
