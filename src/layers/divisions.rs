use serde::Serialize;

use super::FrontGeometry;
use crate::domain::{Division, GeoPoint};
use crate::geometry::offset_by_depth;

/// A division with the position and heading it is drawn at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionView {
    #[serde(flatten)]
    pub division: Division,
    pub display_position: GeoPoint,
    pub bearing: f64,
}

impl DivisionView {
    fn at_rest(division: &Division) -> Self {
        Self {
            division: division.clone(),
            display_position: division.position,
            bearing: 0.0,
        }
    }
}

/// Place a division on its assigned front
///
/// Unassigned divisions, divisions whose front is missing, and divisions
/// on a front without a line stay at their static position with bearing 0.
pub fn derive_division_position(division: &Division, fronts: &[FrontGeometry]) -> DivisionView {
    let Some(assignment) = &division.assignment else {
        return DivisionView::at_rest(division);
    };

    let front = fronts.iter().find(|f| f.front.id == assignment.front_id);
    let Some(front) = front.filter(|f| f.has_line()) else {
        return DivisionView::at_rest(division);
    };

    let placed = offset_by_depth(&front.path, assignment.anchor, assignment.depth);

    DivisionView {
        division: division.clone(),
        display_position: placed.position,
        bearing: placed.bearing,
    }
}

pub fn derive_division_views(
    divisions: &[Division],
    fronts: &[FrontGeometry],
) -> Vec<DivisionView> {
    divisions
        .iter()
        .map(|d| derive_division_position(d, fronts))
        .collect()
}
