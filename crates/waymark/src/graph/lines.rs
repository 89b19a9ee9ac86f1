//! Line segment mutations and their point links.
//!
//! Link rules
//! - `start_point_id`/`end_point_id` are derived from coordinates on every
//!   add/update: whatever point `find_point_at_coordinates` returns for the
//!   center and the resolved endpoint (none for parallels).
//! - `points_on_line` is kept as supplied (explicit links), minus duplicates
//!   and start/end.
//! - Every linked point gets `line_id` set to this line; points that lose
//!   their last link to it get `line_id` cleared.

use tracing::debug;

use super::error::{GraphError, Result};
use super::ids::{LineId, PointId};
use super::store::ElementGraph;
use super::types::{
    ElementKind, LineDeletion, LineDraft, LineGeometry, LinePatch, LineSegment, NoteLink, Point,
};
use crate::geodesic::LatLon;

impl ElementGraph {
    /// Add a line segment, resolving its endpoint and linking coincident points.
    ///
    /// With `create_endpoint_point`, a point named "<line> end" is created at the
    /// resolved endpoint when no point sits there yet.
    pub fn add_line_segment(&mut self, draft: LineDraft) -> Result<LineSegment> {
        let id = draft.id.unwrap_or_else(LineId::generate);
        if self.lines.contains(&id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::LineSegment,
                id: id.0,
            });
        }
        self.ensure_points_exist(&draft.points_on_line)?;

        let endpoint = draft
            .geometry
            .resolve_endpoint(draft.center, self.cfg.geodesic);
        if draft.create_endpoint_point {
            if let Some(end) = endpoint {
                if self.find_point_at_coordinates(end, None).is_none() {
                    self.insert_endpoint_marker(format!("{} end", draft.name), end);
                }
            }
        }

        let mut line = LineSegment {
            id: id.clone(),
            name: draft.name,
            center: draft.center,
            geometry: draft.geometry,
            endpoint,
            color: draft.color,
            start_point_id: None,
            end_point_id: None,
            points_on_line: draft.points_on_line,
        };
        self.derive_line_ends(&mut line);
        let linked = line.linked_points();
        self.lines.insert(id.clone(), line.clone());
        self.claim_points(&id, &linked);
        debug!(
            line = %id,
            mode = ?line.mode(),
            start = ?line.start_point_id,
            end = ?line.end_point_id,
            "line added"
        );
        Ok(line)
    }

    /// Apply a patch and re-derive every link from scratch (diff against the
    /// previous set, so no stale link survives).
    pub fn update_line_segment(&mut self, id: &LineId, patch: LinePatch) -> Result<LineSegment> {
        let mut line = self
            .lines
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::UnknownLine(id.clone()))?;
        if let Some(points) = &patch.points_on_line {
            self.ensure_points_exist(points)?;
        }
        let before = line.linked_points();

        if let Some(name) = patch.name {
            line.name = name;
        }
        if let Some(color) = patch.color {
            line.color = color;
        }
        if let Some(center) = patch.center {
            line.center = center;
        }
        if let Some(geometry) = patch.geometry {
            line.geometry = geometry;
        }
        if let Some(points) = patch.points_on_line {
            line.points_on_line = points;
        }
        line.endpoint = line.geometry.resolve_endpoint(line.center, self.cfg.geodesic);
        self.derive_line_ends(&mut line);

        let after = line.linked_points();
        self.lines.insert(id.clone(), line.clone());
        let released: Vec<PointId> = before.into_iter().filter(|p| !after.contains(p)).collect();
        self.release_points(id, &released);
        self.claim_points(id, &after);
        debug!(line = %id, released = released.len(), linked = after.len(), "line updated");
        Ok(line)
    }

    /// Remove a line: clear `line_id` on its points, delete its notes. Points survive.
    pub fn delete_line_segment(&mut self, id: &LineId) -> Option<LineDeletion> {
        let line = self.lines.remove(id)?;
        let mut unlinked_points = Vec::new();
        for point in self.points.values_mut() {
            if point.line_id.as_ref() == Some(id) {
                point.line_id = None;
                unlinked_points.push(point.id.clone());
            }
        }
        unlinked_points.sort();
        let deleted_notes = self.drop_notes_linked_to(&NoteLink::Line(id.clone()));
        debug!(line = %id, points = unlinked_points.len(), notes = deleted_notes.len(), "line deleted");
        Some(LineDeletion {
            line,
            unlinked_points,
            deleted_notes,
        })
    }

    /// Append `point` to the line's waypoints (no-op if already linked) and point
    /// its `line_id` at the line.
    pub fn attach_point_to_line(&mut self, line_id: &LineId, point_id: &PointId) -> Result<()> {
        if !self.points.contains(point_id) {
            return Err(GraphError::UnknownPoint(point_id.clone()));
        }
        let line = self
            .lines
            .get_mut(line_id)
            .ok_or_else(|| GraphError::UnknownLine(line_id.clone()))?;
        if !line.references_point(point_id) {
            line.points_on_line.push(point_id.clone());
        }
        self.claim_points(line_id, std::slice::from_ref(point_id));
        debug!(line = %line_id, point = %point_id, "point attached to line");
        Ok(())
    }

    /// Remove `point` from the line's waypoints. Start/end links are coordinate
    /// derived and are not touched.
    pub fn detach_point_from_line(&mut self, line_id: &LineId, point_id: &PointId) -> Result<()> {
        let line = self
            .lines
            .get_mut(line_id)
            .ok_or_else(|| GraphError::UnknownLine(line_id.clone()))?;
        line.points_on_line.retain(|p| p != point_id);
        if !line.references_point(point_id) {
            self.release_points(line_id, std::slice::from_ref(point_id));
        }
        debug!(line = %line_id, point = %point_id, "point detached from line");
        Ok(())
    }

    /// Center/endpoint lookups plus waypoint cleanup.
    pub(crate) fn derive_line_ends(&self, line: &mut LineSegment) {
        line.start_point_id = self
            .find_point_at_coordinates(line.center, None)
            .map(|p| p.id.clone());
        line.end_point_id = line
            .endpoint
            .and_then(|e| self.find_point_at_coordinates(e, None))
            .map(|p| p.id.clone());
        let mut seen: Vec<PointId> = Vec::with_capacity(line.points_on_line.len());
        for p in std::mem::take(&mut line.points_on_line) {
            if line.start_point_id.as_ref() == Some(&p) || line.end_point_id.as_ref() == Some(&p) {
                continue;
            }
            if !seen.contains(&p) {
                seen.push(p);
            }
        }
        line.points_on_line = seen;
    }

    pub(crate) fn claim_points(&mut self, line_id: &LineId, points: &[PointId]) {
        for pid in points {
            if let Some(point) = self.points.get_mut(pid) {
                point.line_id = Some(line_id.clone());
            }
        }
    }

    fn release_points(&mut self, line_id: &LineId, points: &[PointId]) {
        for pid in points {
            if let Some(point) = self.points.get_mut(pid) {
                if point.line_id.as_ref() == Some(line_id) {
                    point.line_id = None;
                }
            }
        }
    }

    fn ensure_points_exist(&self, ids: &[PointId]) -> Result<()> {
        match ids.iter().find(|p| !self.points.contains(p)) {
            Some(missing) => Err(GraphError::UnknownPoint(missing.clone())),
            None => Ok(()),
        }
    }

    fn insert_endpoint_marker(&mut self, name: String, at: LatLon) -> PointId {
        let id = PointId::generate();
        self.points.insert(
            id.clone(),
            Point {
                id: id.clone(),
                name,
                coordinates: at,
                elevation: None,
                color: None,
                line_id: None,
                polygon_ids: Default::default(),
            },
        );
        let filled = self.fill_line_ends_with(&id);
        debug!(point = %id, lines_linked = filled, "endpoint marker created");
        id
    }
}

/// Convenience constructors for the four modes.
impl LineGeometry {
    pub fn coordinate(endpoint: LatLon) -> Self {
        LineGeometry::Coordinate { endpoint }
    }

    pub fn azimuth(distance_km: f64, azimuth_deg: f64) -> Self {
        LineGeometry::Azimuth {
            distance_km,
            azimuth_deg,
        }
    }

    pub fn intersection(via: LatLon, distance_km: f64) -> Self {
        LineGeometry::Intersection { via, distance_km }
    }

    pub fn parallel(latitude: f64) -> Self {
        LineGeometry::Parallel { latitude }
    }
}
