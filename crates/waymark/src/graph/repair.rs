//! Snapshot import with reference repair, and export.
//!
//! Import never trusts stored reference fields. It rebuilds every link from
//! coordinates and vertex lists, then keeps a stored id only where it still
//! resolves correctly (the right point at the right place, or a line that
//! links back). This is lossy but safe, and it runs only here, never during
//! normal mutation.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use super::ids::{LineId, PointId, PolygonId};
use super::polygons::MIN_POLYGON_VERTICES;
use super::snapshot::{
    CircleRecord, LayerSnapshot, LineRecord, NoteRecord, PointRecord, PolygonRecord,
};
use super::store::ElementGraph;
use super::types::{Circle, GraphCfg, LineSegment, Note, Point, Polygon};
use crate::geodesic::LatLon;

/// What `load_layers` loaded and what it had to fix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub points: usize,
    pub lines: usize,
    pub polygons: usize,
    pub notes: usize,
    pub circles: usize,
    /// Records skipped because their id was already loaded.
    pub duplicate_ids: usize,
    /// Lines with no usable geometry.
    pub lines_dropped: usize,
    /// Polygons left with fewer than 3 resolvable vertices.
    pub polygons_discarded: usize,
    /// Stored reference ids that did not resolve and were discarded.
    pub stale_refs_dropped: usize,
    /// Start/end links that differ from what was stored (filled, changed or cleared).
    pub line_links_rederived: usize,
    /// Points whose stored `polygonIds` did not match the polygons.
    pub polygon_backrefs_repaired: usize,
    /// Notes kept without their link because the target is gone.
    pub notes_unlinked: usize,
}

impl RepairReport {
    /// True when the snapshot was already consistent.
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids == 0
            && self.lines_dropped == 0
            && self.polygons_discarded == 0
            && self.stale_refs_dropped == 0
            && self.line_links_rederived == 0
            && self.polygon_backrefs_repaired == 0
            && self.notes_unlinked == 0
    }
}

impl ElementGraph {
    /// Build a graph from a snapshot; see [`ElementGraph::load_layers`].
    pub fn from_snapshot(snapshot: LayerSnapshot, cfg: GraphCfg) -> (Self, RepairReport) {
        let mut graph = Self::with_cfg(cfg);
        let report = graph.load_layers(snapshot);
        (graph, report)
    }

    /// Replace the whole graph with `snapshot`, re-deriving every reference.
    pub fn load_layers(&mut self, snapshot: LayerSnapshot) -> RepairReport {
        self.points.clear();
        self.lines.clear();
        self.polygons.clear();
        self.notes.clear();
        self.circles.clear();
        let mut report = RepairReport::default();

        let mut stored_point_lines: HashMap<PointId, LineId> = HashMap::new();
        let mut stored_point_polygons: HashMap<PointId, BTreeSet<PolygonId>> = HashMap::new();
        for rec in snapshot.points {
            if self.points.contains(&rec.id) {
                report.duplicate_ids += 1;
                continue;
            }
            if let Some(lid) = rec.line_id {
                stored_point_lines.insert(rec.id.clone(), lid);
            }
            stored_point_polygons.insert(rec.id.clone(), rec.polygon_ids.into_iter().collect());
            self.points.insert(
                rec.id.clone(),
                Point {
                    id: rec.id,
                    name: rec.name,
                    coordinates: rec.coordinates,
                    elevation: rec.elevation,
                    color: rec.color,
                    line_id: None,
                    polygon_ids: BTreeSet::new(),
                },
            );
        }

        for rec in snapshot.circles {
            if self.circles.contains(&rec.id) {
                report.duplicate_ids += 1;
                continue;
            }
            self.circles.insert(rec.id.clone(), Circle::from(rec));
        }

        for rec in snapshot.line_segments {
            if self.lines.contains(&rec.id) {
                report.duplicate_ids += 1;
                continue;
            }
            match self.repair_line(rec, &mut report) {
                Some(line) => {
                    self.lines.insert(line.id.clone(), line);
                }
                None => report.lines_dropped += 1,
            }
        }

        for rec in snapshot.polygons {
            if self.polygons.contains(&rec.id) {
                report.duplicate_ids += 1;
                continue;
            }
            self.repair_polygon(rec, &mut report);
        }

        self.rebuild_point_line_refs(&stored_point_lines, &mut report);

        for point in self.points.values() {
            if stored_point_polygons.get(&point.id) != Some(&point.polygon_ids) {
                report.polygon_backrefs_repaired += 1;
            }
        }

        for rec in snapshot.notes {
            if self.notes.contains(&rec.id) {
                report.duplicate_ids += 1;
                continue;
            }
            let mut link = rec.link();
            if link.is_none() && rec.linked_element_type.is_some() {
                warn!(
                    note = %rec.id,
                    kind = ?rec.linked_element_type,
                    "note link cannot be resolved, keeping note unlinked"
                );
                report.notes_unlinked += 1;
            }
            if link.as_ref().is_some_and(|l| !self.link_target_exists(l)) {
                warn!(note = %rec.id, "note link target missing, keeping note unlinked");
                report.notes_unlinked += 1;
                link = None;
            }
            self.notes.insert(
                rec.id.clone(),
                Note {
                    id: rec.id,
                    title: rec.title,
                    content: rec.content,
                    link,
                },
            );
        }

        let counts = self.counts();
        report.points = counts.points;
        report.lines = counts.lines;
        report.polygons = counts.polygons;
        report.notes = counts.notes;
        report.circles = counts.circles;
        if report.is_clean() {
            debug!(?counts, "layers loaded");
        } else {
            warn!(?report, "layers loaded with repairs");
        }
        report
    }

    /// Full entity set with every reference field populated, in insertion order.
    pub fn export_layers(&self) -> LayerSnapshot {
        LayerSnapshot {
            circles: self.circles.values().map(CircleRecord::from).collect(),
            line_segments: self.lines.values().map(LineRecord::from).collect(),
            points: self.points.values().map(PointRecord::from).collect(),
            polygons: self.polygons.values().map(PolygonRecord::from).collect(),
            notes: self.notes.values().map(NoteRecord::from).collect(),
        }
    }

    fn repair_line(&self, rec: LineRecord, report: &mut RepairReport) -> Option<LineSegment> {
        let Some(geometry) = rec.geometry() else {
            warn!(line = %rec.id, "line has no usable geometry, dropping");
            return None;
        };
        let endpoint = geometry.resolve_endpoint(rec.center, self.cfg.geodesic);
        let mut line = LineSegment {
            id: rec.id,
            name: rec.name,
            center: rec.center,
            geometry,
            endpoint,
            color: rec.color,
            start_point_id: None,
            end_point_id: None,
            points_on_line: Vec::new(),
        };

        let tol = self.cfg.tolerance_deg;
        let resolves_at = |id: &PointId, at: Option<LatLon>| {
            self.points
                .get(id)
                .zip(at)
                .is_some_and(|(p, at)| p.coordinates.matches(&at, tol))
        };

        // Explicit waypoint links survive when the point still exists.
        for pid in rec.points_on_line {
            if self.points.contains(&pid) {
                line.points_on_line.push(pid);
            } else {
                report.stale_refs_dropped += 1;
            }
        }
        self.derive_line_ends(&mut line);

        // Overlay stored ends that still sit at the right place.
        if let Some(stored) = rec.start_point_id.as_ref() {
            if resolves_at(stored, Some(line.center)) {
                line.start_point_id = Some(stored.clone());
            } else {
                report.stale_refs_dropped += 1;
            }
        }
        if let Some(stored) = rec.end_point_id.as_ref() {
            if resolves_at(stored, line.endpoint) {
                line.end_point_id = Some(stored.clone());
            } else {
                report.stale_refs_dropped += 1;
            }
        }
        line.points_on_line.retain(|p| {
            line.start_point_id.as_ref() != Some(p) && line.end_point_id.as_ref() != Some(p)
        });
        if line.start_point_id != rec.start_point_id {
            report.line_links_rederived += 1;
        }
        if line.end_point_id != rec.end_point_id {
            report.line_links_rederived += 1;
        }
        Some(line)
    }

    fn repair_polygon(&mut self, rec: PolygonRecord, report: &mut RepairReport) {
        let mut point_ids: Vec<PointId> = Vec::with_capacity(rec.point_ids.len());
        for pid in rec.point_ids {
            if !self.points.contains(&pid) {
                report.stale_refs_dropped += 1;
            } else if !point_ids.contains(&pid) {
                point_ids.push(pid);
            }
        }
        if point_ids.len() < MIN_POLYGON_VERTICES {
            warn!(polygon = %rec.id, vertices = point_ids.len(), "polygon below 3 vertices, discarding");
            report.polygons_discarded += 1;
            return;
        }
        for pid in &point_ids {
            if let Some(point) = self.points.get_mut(pid) {
                point.polygon_ids.insert(rec.id.clone());
            }
        }
        self.polygons.insert(
            rec.id.clone(),
            Polygon {
                id: rec.id,
                name: rec.name,
                point_ids,
                color: rec.color,
            },
        );
    }

    /// Each linked point takes the last line (in order) that links it; a stored
    /// `lineId` wins when that line still links back.
    fn rebuild_point_line_refs(
        &mut self,
        stored: &HashMap<PointId, LineId>,
        report: &mut RepairReport,
    ) {
        let mut derived: HashMap<PointId, LineId> = HashMap::new();
        for line in self.lines.values() {
            for pid in line.linked_points() {
                derived.insert(pid, line.id.clone());
            }
        }
        for (pid, lid) in stored {
            let links_back = self
                .lines
                .get(lid)
                .is_some_and(|l| l.references_point(pid));
            if links_back {
                derived.insert(pid.clone(), lid.clone());
            } else if self.points.contains(pid) {
                report.stale_refs_dropped += 1;
            }
        }
        for point in self.points.values_mut() {
            point.line_id = derived.remove(&point.id);
        }
    }
}
