//! The owned entity store, read queries and point mutations.

use tracing::debug;

use super::error::{GraphError, Result};
use super::ids::{CircleId, LineId, NoteId, PointId, PolygonId};
use super::table::Table;
use super::types::{
    Circle, ElementCounts, ElementKind, GraphCfg, LineSegment, Note, NoteLink, Point, PointDeletion,
    PointDraft, PointPatch, Polygon,
};
use crate::geodesic::LatLon;

/// In-memory store of map elements that keeps their cross references consistent.
///
/// There is no global state: every graph is an independent value, and every
/// table is private so that the reference maintenance cannot be bypassed.
#[derive(Clone, Debug, Default)]
pub struct ElementGraph {
    pub(crate) cfg: GraphCfg,
    pub(crate) points: Table<PointId, Point>,
    pub(crate) lines: Table<LineId, LineSegment>,
    pub(crate) polygons: Table<PolygonId, Polygon>,
    pub(crate) notes: Table<NoteId, Note>,
    pub(crate) circles: Table<CircleId, Circle>,
}

impl ElementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cfg(cfg: GraphCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    #[inline]
    pub fn cfg(&self) -> &GraphCfg {
        &self.cfg
    }

    // --- reads ---

    pub fn point(&self, id: &PointId) -> Option<&Point> {
        self.points.get(id)
    }

    pub fn line(&self, id: &LineId) -> Option<&LineSegment> {
        self.lines.get(id)
    }

    pub fn polygon(&self, id: &PolygonId) -> Option<&Polygon> {
        self.polygons.get(id)
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn circle(&self, id: &CircleId) -> Option<&Circle> {
        self.circles.get(id)
    }

    /// Points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> + '_ {
        self.lines.values()
    }

    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> + '_ {
        self.polygons.values()
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.notes.values()
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> + '_ {
        self.circles.values()
    }

    pub fn counts(&self) -> ElementCounts {
        ElementCounts {
            points: self.points.len(),
            lines: self.lines.len(),
            polygons: self.polygons.len(),
            notes: self.notes.len(),
            circles: self.circles.len(),
        }
    }

    /// Closest point whose coordinates match `at` within `tolerance` degrees per
    /// axis (graph default when `None`). Ties go to the earliest inserted point.
    pub fn find_point_at_coordinates(&self, at: LatLon, tolerance: Option<f64>) -> Option<&Point> {
        let tol = tolerance.unwrap_or(self.cfg.tolerance_deg);
        let mut best: Option<(&Point, f64)> = None;
        for p in self.points.values() {
            if !p.coordinates.matches(&at, tol) {
                continue;
            }
            let d = p.coordinates.max_abs_diff(&at);
            if best.as_ref().is_none_or(|(_, bd)| d < *bd) {
                best = Some((p, d));
            }
        }
        best.map(|(p, _)| p)
    }

    /// Lines that use the point as start, end or waypoint.
    pub fn lines_referencing_point(&self, id: &PointId) -> Vec<&LineSegment> {
        self.lines
            .values()
            .filter(|l| l.references_point(id))
            .collect()
    }

    /// Polygons that use the point as a vertex.
    pub fn polygons_referencing_point(&self, id: &PointId) -> Vec<&Polygon> {
        self.polygons
            .values()
            .filter(|p| p.point_ids.contains(id))
            .collect()
    }

    /// Notes attached to `link`.
    pub fn notes_linked_to(&self, link: &NoteLink) -> Vec<&Note> {
        self.notes
            .values()
            .filter(|n| n.link.as_ref() == Some(link))
            .collect()
    }

    pub(crate) fn link_target_exists(&self, link: &NoteLink) -> bool {
        match link {
            NoteLink::Point(id) => self.points.contains(id),
            NoteLink::Line(id) => self.lines.contains(id),
            NoteLink::Polygon(id) => self.polygons.contains(id),
            NoteLink::Circle(id) => self.circles.contains(id),
        }
    }

    /// Delete every note attached to `link`; returns their ids.
    pub(crate) fn drop_notes_linked_to(&mut self, link: &NoteLink) -> Vec<NoteId> {
        let ids: Vec<NoteId> = self
            .notes
            .values()
            .filter(|n| n.link.as_ref() == Some(link))
            .map(|n| n.id.clone())
            .collect();
        for id in &ids {
            self.notes.remove(id);
        }
        ids
    }

    // --- points ---

    /// Add a point, then let it fill any empty line start/end slot it sits on.
    pub fn add_point(&mut self, draft: PointDraft) -> Result<Point> {
        let id = draft.id.unwrap_or_else(PointId::generate);
        if self.points.contains(&id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::Point,
                id: id.0,
            });
        }
        let point = Point {
            id: id.clone(),
            name: draft.name,
            coordinates: draft.coordinates,
            elevation: draft.elevation,
            color: draft.color,
            line_id: None,
            polygon_ids: Default::default(),
        };
        self.points.insert(id.clone(), point);
        let filled = self.fill_line_ends_with(&id);
        debug!(point = %id, lines_linked = filled, "point added");
        self.point_snapshot(&id)
    }

    /// Apply a patch. Moving a point clears line start/end links it no longer
    /// matches and fills empty slots it now matches; waypoint links persist.
    pub fn update_point(&mut self, id: &PointId, patch: PointPatch) -> Result<Point> {
        let point = self
            .points
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownPoint(id.clone()))?;
        if let Some(name) = patch.name {
            point.name = name;
        }
        if let Some(elevation) = patch.elevation {
            point.elevation = elevation;
        }
        if let Some(color) = patch.color {
            point.color = color;
        }
        let moved = match patch.coordinates {
            Some(c) if c != point.coordinates => {
                point.coordinates = c;
                true
            }
            _ => false,
        };
        if moved {
            let cleared = self.clear_stale_line_ends(id);
            let filled = self.fill_line_ends_with(id);
            debug!(point = %id, cleared, filled, "point moved");
        } else {
            debug!(point = %id, "point updated");
        }
        self.point_snapshot(id)
    }

    /// Remove a point and cascade: lines lose the reference, polygons shrink or
    /// are deleted below 3 vertices, linked notes are deleted. `None` if absent.
    pub fn delete_point(&mut self, id: &PointId) -> Option<PointDeletion> {
        if !self.points.contains(id) {
            return None;
        }

        let mut detached_lines = Vec::new();
        for line in self.lines.values_mut() {
            let mut touched = false;
            if line.start_point_id.as_ref() == Some(id) {
                line.start_point_id = None;
                touched = true;
            }
            if line.end_point_id.as_ref() == Some(id) {
                line.end_point_id = None;
                touched = true;
            }
            let before = line.points_on_line.len();
            line.points_on_line.retain(|p| p != id);
            if touched || line.points_on_line.len() != before {
                detached_lines.push(line.id.clone());
            }
        }
        // hash order from values_mut
        detached_lines.sort();

        let mut shrunk_polygons = Vec::new();
        let mut deleted_polygons = Vec::new();
        let mut deleted_notes = Vec::new();
        let affected: Vec<PolygonId> = self
            .polygons
            .values()
            .filter(|p| p.point_ids.contains(id))
            .map(|p| p.id.clone())
            .collect();
        for pid in affected {
            let remaining = match self.polygons.get_mut(&pid) {
                Some(poly) => {
                    poly.point_ids.retain(|p| p != id);
                    poly.point_ids.len()
                }
                None => continue,
            };
            if remaining < 3 {
                if let Some(gone) = self.delete_polygon(&pid) {
                    deleted_notes.extend(gone.deleted_notes);
                    deleted_polygons.push(gone.polygon);
                }
            } else {
                shrunk_polygons.push(pid);
            }
        }

        deleted_notes.extend(self.drop_notes_linked_to(&NoteLink::Point(id.clone())));
        let point = self.points.remove(id)?;
        debug!(
            point = %id,
            lines = detached_lines.len(),
            shrunk = shrunk_polygons.len(),
            deleted_polygons = deleted_polygons.len(),
            notes = deleted_notes.len(),
            "point deleted"
        );
        Some(PointDeletion {
            point,
            detached_lines,
            shrunk_polygons,
            deleted_polygons,
            deleted_notes,
        })
    }

    fn point_snapshot(&self, id: &PointId) -> Result<Point> {
        self.points
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::UnknownPoint(id.clone()))
    }

    /// Clear start/end slots held by `id` whose line position it no longer matches.
    fn clear_stale_line_ends(&mut self, id: &PointId) -> usize {
        let Some(at) = self.points.get(id).map(|p| p.coordinates) else {
            return 0;
        };
        let tol = self.cfg.tolerance_deg;
        let mut cleared = 0;
        let mut released: Vec<LineId> = Vec::new();
        for line in self.lines.values_mut() {
            if line.start_point_id.as_ref() == Some(id) && !line.center.matches(&at, tol) {
                line.start_point_id = None;
                cleared += 1;
            }
            if line.end_point_id.as_ref() == Some(id)
                && !line.endpoint.is_some_and(|e| e.matches(&at, tol))
            {
                line.end_point_id = None;
                cleared += 1;
            }
            if !line.references_point(id) {
                released.push(line.id.clone());
            }
        }
        if let Some(point) = self.points.get_mut(id) {
            if point.line_id.as_ref().is_some_and(|l| released.contains(l)) {
                point.line_id = None;
            }
        }
        cleared
    }

    /// Put `id` into every empty start/end slot whose position it matches.
    pub(crate) fn fill_line_ends_with(&mut self, id: &PointId) -> usize {
        let Some(at) = self.points.get(id).map(|p| p.coordinates) else {
            return 0;
        };
        let tol = self.cfg.tolerance_deg;
        let mut last: Option<LineId> = None;
        let mut filled = 0;
        let order: Vec<LineId> = self.lines.keys().cloned().collect();
        for lid in order {
            let Some(line) = self.lines.get_mut(&lid) else {
                continue;
            };
            let mut took_slot = false;
            if line.start_point_id.is_none() && line.center.matches(&at, tol) {
                line.start_point_id = Some(id.clone());
                took_slot = true;
                filled += 1;
            }
            if line.end_point_id.is_none() && line.endpoint.is_some_and(|e| e.matches(&at, tol)) {
                line.end_point_id = Some(id.clone());
                took_slot = true;
                filled += 1;
            }
            if took_slot {
                // an end is never also a waypoint
                line.points_on_line.retain(|p| p != id);
                last = Some(lid.clone());
            }
        }
        if let (Some(lid), Some(point)) = (last, self.points.get_mut(id)) {
            point.line_id = Some(lid);
        }
        filled
    }
}
