use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::triangulation::triangulate_band;
use crate::domain::GeoPoint;
use crate::layers::{DivisionView, FrontGeometry};
use crate::simulation::Snapshot;

/// GeoJSON positions are `[lng, lat]`
fn position(p: &GeoPoint) -> Value {
    json!([p.longitude, p.latitude])
}

fn line(points: &[GeoPoint]) -> Value {
    Value::Array(points.iter().map(position).collect())
}

/// Close a ring by repeating its first vertex
fn ring(points: &[GeoPoint]) -> Value {
    let mut coords: Vec<Value> = points.iter().map(position).collect();
    if let Some(first) = points.first() {
        coords.push(position(first));
    }
    Value::Array(coords)
}

fn feature(geometry: Value, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}

fn front_features(geometry: &FrontGeometry, with_triangles: bool) -> Vec<Value> {
    let front = &geometry.front;
    let mut features = Vec::with_capacity(3);

    if let Some(band) = &geometry.band {
        let mut properties = json!({
            "kind": "band",
            "front": front.id,
            "color": front.color,
            "width": front.width,
        });
        if with_triangles {
            let triangles: Vec<Value> = triangulate_band(band)
                .iter()
                .map(|t| Value::Array(t.iter().map(position).collect()))
                .collect();
            properties["triangles"] = Value::Array(triangles);
        }
        features.push(feature(
            json!({ "type": "Polygon", "coordinates": [ring(band)] }),
            properties,
        ));
    }

    if geometry.has_line() {
        features.push(feature(
            json!({ "type": "LineString", "coordinates": line(&geometry.path) }),
            json!({
                "kind": "line",
                "front": front.id,
                "color": front.color,
            }),
        ));
    }

    features.push(feature(
        json!({ "type": "Point", "coordinates": position(&geometry.label_position) }),
        json!({
            "kind": "label",
            "front": front.id,
            "name": front.display_name(),
            "objective": front.objective,
            "state": front.state,
            "progress": front.progress,
            "readiness": front.readiness,
            "supply": front.supply,
            "bearing": geometry.bearing,
        }),
    ));

    features
}

fn division_feature(view: &DivisionView) -> Value {
    let division = &view.division;
    feature(
        json!({ "type": "Point", "coordinates": position(&view.display_position) }),
        json!({
            "kind": "division",
            "id": division.id,
            "name": division.display_name(),
            "faction": division.faction,
            "type": division.kind,
            "status": division.status,
            "strength": division.strength,
            "organization": division.organization,
            "front": division.assignment.as_ref().map(|a| a.front_id.as_str()),
            "bearing": view.bearing,
        }),
    )
}

/// Convert a snapshot into a GeoJSON FeatureCollection
///
/// Per front: band polygon and line (when the path has a segment) and
/// a label point.
/// Per division: a point at its display position.
pub fn scene_to_geojson(snapshot: &Snapshot, with_triangles: bool) -> Value {
    let mut features: Vec<Value> = snapshot
        .fronts
        .iter()
        .flat_map(|f| front_features(f, with_triangles))
        .collect();
    features.extend(snapshot.divisions.iter().map(division_feature));

    json!({
        "type": "FeatureCollection",
        "properties": { "time": snapshot.time.to_rfc3339() },
        "features": features,
    })
}

/// Write a snapshot as pretty-printed GeoJSON
///
/// # Returns
/// Number of features written
pub fn write_geojson(path: &Path, snapshot: &Snapshot, with_triangles: bool) -> Result<usize> {
    let collection = scene_to_geojson(snapshot, with_triangles);
    let count = collection["features"].as_array().map_or(0, Vec::len);

    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &collection)
        .with_context(|| format!("Failed to write GeoJSON file: {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::domain::{Assignment, Division, Faction, Front, Scenario};
    use crate::simulation::Simulation;
    use std::fs;
    use tempfile::tempdir;

    fn snapshot() -> Snapshot {
        let front = Front::new(
            "center",
            vec![GeoPoint::new(52.0, 23.0), GeoPoint::new(51.5, 23.5)],
            vec![GeoPoint::new(52.1, 23.4), GeoPoint::new(51.6, 23.9)],
        );
        let dot = Front::new("dot", vec![GeoPoint::new(50.0, 20.0)], Vec::new());
        let division = Division::new("1pz", Faction::Friendly, GeoPoint::new(51.2, 23.4))
            .with_assignment(Assignment::new("center", 0.5, -5000.0));

        Simulation::new(
            Scenario {
                fronts: vec![front, dot],
                divisions: vec![division],
                ..Scenario::default()
            },
            SimulationConfig::default(),
        )
        .snapshot()
    }

    #[test]
    fn test_feature_collection_layout() {
        let collection = scene_to_geojson(&snapshot(), false);
        let features = collection["features"].as_array().unwrap();

        // center: band + line + label, dot: label only, one division
        assert_eq!(features.len(), 5);
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["properties"]["kind"], "band");
        assert_eq!(features[1]["geometry"]["type"], "LineString");
        assert_eq!(features[3]["properties"]["front"], "dot");
        assert_eq!(features[3]["properties"]["kind"], "label");
        assert_eq!(features[4]["properties"]["kind"], "division");
        assert_eq!(features[4]["properties"]["faction"], "friendly");
    }

    #[test]
    fn test_band_ring_is_closed_lng_lat() {
        let collection = scene_to_geojson(&snapshot(), false);
        let ring = collection["features"][0]["geometry"]["coordinates"][0]
            .as_array()
            .unwrap();

        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        // Longitude first
        let lng = ring[0][0].as_f64().unwrap();
        assert!(lng > 22.0 && lng < 24.0);
    }

    #[test]
    fn test_triangles_are_optional() {
        let plain = scene_to_geojson(&snapshot(), false);
        assert!(plain["features"][0]["properties"].get("triangles").is_none());

        let meshed = scene_to_geojson(&snapshot(), true);
        let triangles = meshed["features"][0]["properties"]["triangles"]
            .as_array()
            .unwrap();
        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn test_write_geojson() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.geojson");

        let count = write_geojson(&path, &snapshot(), false).unwrap();
        assert_eq!(count, 5);

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
    }
}
