use super::*;
use crate::geodesic::LatLon;

fn load(json: &str) -> (ElementGraph, RepairReport) {
    let snapshot = LayerSnapshot::from_json(json).unwrap();
    ElementGraph::from_snapshot(snapshot, GraphCfg::default())
}

#[test]
fn legacy_snapshot_without_back_refs_is_rebuilt() {
    // numeric ids, no lineId/polygonIds/startPointId/endPointId, no mode
    let json = r#"{
        "points": [
            {"id": 1, "name": "A", "coordinates": {"lat": 48.8566, "lng": 2.3522}},
            {"id": 2, "name": "B", "coordinates": {"lat": 48.8600, "lng": 2.3550}},
            {"id": 3, "name": "C", "coordinates": {"lat": 48.8700, "lng": 2.3400}}
        ],
        "lineSegments": [
            {"id": 10, "name": "AB", "center": {"lat": 48.8566, "lng": 2.3522},
             "endpoint": {"lat": 48.8600, "lng": 2.3550}}
        ],
        "polygons": [
            {"id": 20, "name": "tri", "pointIds": [1, 2, 3]}
        ]
    }"#;
    let (g, report) = load(json);
    assert_eq!(report.points, 3);
    assert_eq!(report.lines, 1);
    assert_eq!(report.polygons, 1);
    assert_eq!(report.line_links_rederived, 2);
    assert_eq!(report.polygon_backrefs_repaired, 3);
    assert!(!report.is_clean());

    let line = g.line(&"10".into()).unwrap();
    assert_eq!(line.mode(), LineMode::Coordinate);
    assert_eq!(line.start_point_id, Some("1".into()));
    assert_eq!(line.end_point_id, Some("2".into()));
    assert_eq!(g.point(&"1".into()).unwrap().line_id, Some("10".into()));
    assert_eq!(g.point(&"3".into()).unwrap().line_id, None);
    for pid in ["1", "2", "3"] {
        let point = g.point(&pid.into()).unwrap();
        assert!(point.polygon_ids.contains(&PolygonId::from("20")));
    }
    assert!(g.check_invariants().is_empty());
}

#[test]
fn stale_references_are_dropped() {
    let json = r#"{
        "points": [
            {"id": "a", "coordinates": {"lat": 0.0, "lon": 0.0}, "lineId": "gone", "polygonIds": ["nope"]},
            {"id": "b", "coordinates": {"lat": 1.0, "lon": 1.0}}
        ],
        "lineSegments": [
            {"id": "l", "center": {"lat": 0.0, "lon": 0.0}, "mode": "coordinate",
             "endpoint": {"lat": 1.0, "lon": 1.0},
             "startPointId": "ghost", "endPointId": "a", "pointsOnLine": ["ghost2"]}
        ]
    }"#;
    let (g, report) = load(json);
    // ghost start, misplaced end, ghost waypoint, dangling lineId
    assert_eq!(report.stale_refs_dropped, 4);
    let line = g.line(&"l".into()).unwrap();
    assert_eq!(line.start_point_id, Some("a".into()));
    assert_eq!(line.end_point_id, Some("b".into()));
    assert!(line.points_on_line.is_empty());
    assert_eq!(g.point(&"a".into()).unwrap().line_id, Some("l".into()));
    assert!(g.point(&"a".into()).unwrap().polygon_ids.is_empty());
    assert!(g.check_invariants().is_empty());
}

#[test]
fn polygons_below_three_resolvable_vertices_are_discarded() {
    let json = r#"{
        "points": [
            {"id": "a", "coordinates": {"lat": 0.0, "lon": 0.0}},
            {"id": "b", "coordinates": {"lat": 0.0, "lon": 1.0}},
            {"id": "c", "coordinates": {"lat": 1.0, "lon": 1.0}}
        ],
        "polygons": [
            {"id": "bad", "pointIds": ["a", "b", "missing"]},
            {"id": "closed", "pointIds": ["a", "b", "c", "a"]}
        ],
        "notes": [
            {"id": "n1", "title": "on bad", "linkedElementType": "polygon", "linkedElementId": "bad"}
        ]
    }"#;
    let (g, report) = load(json);
    assert_eq!(report.polygons_discarded, 1);
    assert_eq!(report.notes_unlinked, 1);
    assert!(g.polygon(&"bad".into()).is_none());
    assert_eq!(g.polygon(&"closed".into()).unwrap().point_ids.len(), 3);
    let note = g.note(&"n1".into()).unwrap();
    assert_eq!(note.link, None);
    assert!(g.check_invariants().is_empty());
}

#[test]
fn line_modes_are_read_from_flat_fields() {
    let json = r#"{
        "lineSegments": [
            {"id": "az", "center": {"lat": 10.0, "lon": 10.0}, "distance": 5.0, "azimuth": 90.0},
            {"id": "par", "center": {"lat": 10.0, "lon": 10.0}, "mode": "parallel", "longitude": 12.5},
            {"id": "ix", "center": {"lat": 10.0, "lon": 10.0}, "mode": "intersection",
             "intersectionPoint": {"lat": 10.1, "lon": 10.1}, "intersectionDistance": 20.0},
            {"id": "empty", "center": {"lat": 10.0, "lon": 10.0}}
        ]
    }"#;
    let (g, report) = load(json);
    assert_eq!(report.lines_dropped, 1);
    assert_eq!(g.line(&"az".into()).unwrap().mode(), LineMode::Azimuth);
    let par = g.line(&"par".into()).unwrap();
    assert_eq!(par.geometry, LineGeometry::Parallel { latitude: 12.5 });
    assert_eq!(par.endpoint, None);
    let ix = g.line(&"ix".into()).unwrap();
    assert_eq!(ix.mode(), LineMode::Intersection);
    assert!(ix.endpoint.is_some());
    assert!(g.line(&"empty".into()).is_none());

    // parallel latitude goes back out under the historical field name
    let out = serde_json::to_value(g.export_layers()).unwrap();
    let par_out = &out["lineSegments"][1];
    assert_eq!(par_out["longitude"], 12.5);
    assert_eq!(par_out["mode"], "parallel");
}

#[test]
fn circle_fields_pass_through() {
    let json = r##"{
        "circles": [
            {"id": 7, "name": "ring", "center": {"lat": 1.0, "lon": 2.0}, "radius": 3.5,
             "color": "#ff0000", "strokeWidth": 2, "label": {"visible": true}}
        ]
    }"##;
    let (g, report) = load(json);
    assert!(report.is_clean());
    let circle = g.circle(&"7".into()).unwrap();
    assert_eq!(circle.radius_km, 3.5);
    assert_eq!(circle.color.as_deref(), Some("#ff0000"));
    let out = serde_json::to_value(g.export_layers()).unwrap();
    let c = &out["circles"][0];
    assert_eq!(c["strokeWidth"], 2);
    assert_eq!(c["label"]["visible"], true);
    assert_eq!(c["radius"], 3.5);
    assert_eq!(c["id"], "7");
}

#[test]
fn duplicate_records_keep_the_first() {
    let json = r#"{
        "points": [
            {"id": "a", "name": "first", "coordinates": {"lat": 0.0, "lon": 0.0}},
            {"id": "a", "name": "second", "coordinates": {"lat": 5.0, "lon": 5.0}}
        ]
    }"#;
    let (g, report) = load(json);
    assert_eq!(report.duplicate_ids, 1);
    assert_eq!(g.point(&"a".into()).unwrap().name, "first");
}

#[test]
fn export_then_load_is_clean_and_stable() {
    let mut g = ElementGraph::new();
    let a = g
        .add_point(PointDraft::new("A", LatLon::new(48.8566, 2.3522)))
        .unwrap()
        .id;
    let b = g
        .add_point(PointDraft::new("B", LatLon::new(48.8600, 2.3550)))
        .unwrap()
        .id;
    let c = g
        .add_point(PointDraft::new("C", LatLon::new(48.8700, 2.3400)))
        .unwrap()
        .id;
    let line = g
        .add_line_segment(LineDraft::new(
            "AB",
            LatLon::new(48.8566, 2.3522),
            LineGeometry::coordinate(LatLon::new(48.8600, 2.3550)),
        ))
        .unwrap()
        .id;
    g.attach_point_to_line(&line, &c).unwrap();
    let poly = g
        .add_polygon(PolygonDraft::new("tri", vec![a.clone(), b, c]))
        .unwrap()
        .id;
    g.add_note(NoteDraft::new("n", "x").linked_to(NoteLink::Polygon(poly)))
        .unwrap();
    g.add_note(NoteDraft::new("m", "y").linked_to(NoteLink::Point(a)))
        .unwrap();
    g.add_circle(CircleDraft::new("r", LatLon::new(48.0, 2.0), 1.0))
        .unwrap();

    let exported = g.export_layers();
    let text = exported.to_json_pretty().unwrap();
    let (reloaded, report) = load(&text);
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(reloaded.counts(), g.counts());
    assert_eq!(reloaded.export_layers(), exported);
}

#[test]
fn load_replaces_previous_contents() {
    let mut g = ElementGraph::new();
    g.add_point(PointDraft::new("old", LatLon::new(0.0, 0.0)))
        .unwrap();
    let report = g.load_layers(LayerSnapshot::default());
    assert_eq!(report, RepairReport::default());
    assert_eq!(g.counts(), ElementCounts::default());
}

#[test]
fn note_link_kinds_accept_legacy_line_name() {
    let json = r#"{
        "lineSegments": [
            {"id": "l", "center": {"lat": 0.0, "lon": 0.0}, "endpoint": {"lat": 1.0, "lon": 0.0}}
        ],
        "notes": [
            {"id": "n", "title": "t", "content": "c", "linkedElementType": "line", "linkedElementId": "l"},
            {"id": "free", "title": "f"}
        ]
    }"#;
    let (g, report) = load(json);
    assert_eq!(report.notes_unlinked, 0);
    assert_eq!(g.note(&"n".into()).unwrap().link, Some(NoteLink::Line("l".into())));
    assert_eq!(g.note(&"free".into()).unwrap().link, None);
    let out = serde_json::to_value(g.export_layers()).unwrap();
    assert_eq!(out["notes"][0]["linkedElementType"], "lineSegment");
}

#[test]
fn unresolvable_note_link_kind_is_counted() {
    let json = r#"{
        "notes": [
            {"id": "a", "title": "t"},
            {"id": "b", "title": "self", "linkedElementType": "note", "linkedElementId": "a"}
        ]
    }"#;
    let (g, report) = load(json);
    assert_eq!(report.notes_unlinked, 1);
    assert!(!report.is_clean());
    assert_eq!(g.note(&"b".into()).unwrap().link, None);
    assert!(g.check_invariants().is_empty());
}
