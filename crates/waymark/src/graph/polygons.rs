//! Polygon mutations. Vertex membership is mirrored in `Point::polygon_ids`.

use std::collections::BTreeSet;

use tracing::debug;

use super::error::{GraphError, Result};
use super::ids::{PointId, PolygonId};
use super::store::ElementGraph;
use super::types::{
    ElementKind, NoteLink, Polygon, PolygonDeletion, PolygonDraft, PolygonPatch,
};
use crate::geodesic::LatLon;

/// Minimum number of distinct vertices of a polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

impl ElementGraph {
    /// Add a polygon over existing points. Repeated ids (e.g. a closing vertex)
    /// are collapsed; fewer than 3 distinct vertices is rejected.
    pub fn add_polygon(&mut self, draft: PolygonDraft) -> Result<Polygon> {
        let id = draft.id.unwrap_or_else(PolygonId::generate);
        if self.polygons.contains(&id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::Polygon,
                id: id.0,
            });
        }
        let point_ids = self.normalize_vertices(draft.point_ids)?;
        let polygon = Polygon {
            id: id.clone(),
            name: draft.name,
            point_ids,
            color: draft.color,
        };
        for pid in &polygon.point_ids {
            if let Some(point) = self.points.get_mut(pid) {
                point.polygon_ids.insert(id.clone());
            }
        }
        self.polygons.insert(id.clone(), polygon.clone());
        debug!(polygon = %id, vertices = polygon.point_ids.len(), "polygon added");
        Ok(polygon)
    }

    /// Add a polygon from map coordinates, resolving each to an existing point.
    /// Coordinates with no point nearby are dropped.
    pub fn add_polygon_at(
        &mut self,
        name: impl Into<String>,
        vertices: &[LatLon],
        tolerance: Option<f64>,
    ) -> Result<Polygon> {
        let point_ids: Vec<PointId> = vertices
            .iter()
            .filter_map(|at| self.find_point_at_coordinates(*at, tolerance))
            .map(|p| p.id.clone())
            .collect();
        if point_ids.len() < vertices.len() {
            debug!(
                requested = vertices.len(),
                resolved = point_ids.len(),
                "dropped unresolvable polygon vertices"
            );
        }
        self.add_polygon(PolygonDraft::new(name, point_ids))
    }

    /// Apply a patch. A new vertex list replaces the old one and back references
    /// are diffed against the previous membership.
    pub fn update_polygon(&mut self, id: &PolygonId, patch: PolygonPatch) -> Result<Polygon> {
        if !self.polygons.contains(id) {
            return Err(GraphError::UnknownPolygon(id.clone()));
        }
        let new_vertices = match patch.point_ids {
            Some(ids) => Some(self.normalize_vertices(ids)?),
            None => None,
        };
        let polygon = self
            .polygons
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownPolygon(id.clone()))?;
        if let Some(name) = patch.name {
            polygon.name = name;
        }
        if let Some(color) = patch.color {
            polygon.color = color;
        }
        let mut diff = (Vec::new(), Vec::new());
        if let Some(vertices) = new_vertices {
            let old: BTreeSet<PointId> = polygon.point_ids.iter().cloned().collect();
            let new: BTreeSet<PointId> = vertices.iter().cloned().collect();
            diff = (
                old.difference(&new).cloned().collect::<Vec<_>>(),
                new.difference(&old).cloned().collect::<Vec<_>>(),
            );
            polygon.point_ids = vertices;
        }
        let polygon = polygon.clone();

        let (removed, added) = diff;
        for pid in &removed {
            if let Some(point) = self.points.get_mut(pid) {
                point.polygon_ids.remove(id);
            }
        }
        for pid in &polygon.point_ids {
            if let Some(point) = self.points.get_mut(pid) {
                point.polygon_ids.insert(id.clone());
            }
        }
        debug!(polygon = %id, removed = removed.len(), added = added.len(), "polygon updated");
        Ok(polygon)
    }

    /// Remove a polygon: vertices lose the back reference, linked notes are deleted.
    pub fn delete_polygon(&mut self, id: &PolygonId) -> Option<PolygonDeletion> {
        let polygon = self.polygons.remove(id)?;
        for pid in &polygon.point_ids {
            if let Some(point) = self.points.get_mut(pid) {
                point.polygon_ids.remove(id);
            }
        }
        let deleted_notes = self.drop_notes_linked_to(&NoteLink::Polygon(id.clone()));
        debug!(polygon = %id, notes = deleted_notes.len(), "polygon deleted");
        Some(PolygonDeletion {
            polygon,
            deleted_notes,
        })
    }

    /// Drop repeated ids (first occurrence wins), require every id to exist
    /// and at least 3 to remain.
    fn normalize_vertices(&self, ids: Vec<PointId>) -> Result<Vec<PointId>> {
        let mut out: Vec<PointId> = Vec::with_capacity(ids.len());
        for pid in ids {
            if !self.points.contains(&pid) {
                return Err(GraphError::UnknownPoint(pid));
            }
            if !out.contains(&pid) {
                out.push(pid);
            }
        }
        if out.len() < MIN_POLYGON_VERTICES {
            return Err(GraphError::TooFewVertices {
                distinct: out.len(),
            });
        }
        Ok(out)
    }
}
