use earcutr::earcut;

use crate::domain::GeoPoint;
use crate::geometry::project_path;

/// Triangulate a band polygon for fill rendering
///
/// Earcut runs in projected space so triangles follow the on-screen shape.
/// Vertices come back in lat/lon. Empty for fewer than 3 vertices or a
/// ring earcut cannot handle.
pub fn triangulate_band(band: &[GeoPoint]) -> Vec<[GeoPoint; 3]> {
    if band.len() < 3 {
        return Vec::new();
    }

    let vertices: Vec<f64> = project_path(band)
        .iter()
        .flat_map(|p| [p.x, p.y])
        .collect();

    let indices = earcut(&vertices, &[], 2).unwrap_or_default();

    indices
        .chunks_exact(3)
        .map(|t| [band[t[0]], band[t[1]], band[t[2]]])
        .collect()
}
