//! Curated surface for embedding applications.
//!
//! Re-exports everything a host needs to drive the graph and draw its output
//! without reaching into module paths.

// Geodesy
pub use crate::geodesic::{
    calculate_bearing, calculate_inverse_bearing, destination_point, endpoint_from_intersection,
    endpoint_from_intersection_with_cfg, generate_circle, generate_line_points_linear,
    geodesic_distance_km, normalize_bearing, normalize_longitude, parallel_points, project,
    unproject, GeodesicCfg, LatLon, EARTH_RADIUS_KM,
};
// Graph
pub use crate::graph::snapshot::{
    CircleRecord, LayerSnapshot, LineRecord, NoteRecord, PointRecord, PolygonRecord,
};
pub use crate::graph::{
    Circle, CircleDraft, CircleId, CirclePatch, ElementCounts, ElementGraph, ElementKind,
    GraphCfg, GraphError, LineDraft, LineGeometry, LineId, LineMode, LinePatch, LineSegment, Note,
    NoteDraft, NoteId, NoteLink, NotePatch, Point, PointDraft, PointId, PointPatch, Polygon,
    PolygonDraft, PolygonId, PolygonPatch, RepairReport, Violation,
};

/// Default name for the next entity of a kind, e.g. "Point 3".
pub fn default_name(graph: &ElementGraph, kind: ElementKind) -> String {
    let counts = graph.counts();
    let (label, n) = match kind {
        ElementKind::Point => ("Point", counts.points),
        ElementKind::LineSegment => ("Line", counts.lines),
        ElementKind::Polygon => ("Polygon", counts.polygons),
        ElementKind::Note => ("Note", counts.notes),
        ElementKind::Circle => ("Circle", counts.circles),
    };
    format!("{label} {}", n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_count_up() {
        let mut g = ElementGraph::new();
        assert_eq!(default_name(&g, ElementKind::Point), "Point 1");
        g.add_point(PointDraft::new("a", LatLon::new(1.0, 1.0))).unwrap();
        g.add_point(PointDraft::new("b", LatLon::new(2.0, 2.0))).unwrap();
        assert_eq!(default_name(&g, ElementKind::Point), "Point 3");
        assert_eq!(default_name(&g, ElementKind::LineSegment), "Line 1");
    }
}
