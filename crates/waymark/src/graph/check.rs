//! Structural self-check of the reference invariants.

use std::collections::BTreeSet;
use std::fmt;

use super::ids::{LineId, NoteId, PointId, PolygonId};
use super::polygons::MIN_POLYGON_VERTICES;
use super::store::ElementGraph;

/// One broken invariant.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// `Point::polygon_ids` differs from the polygons that list the point.
    PolygonBackRef {
        point: PointId,
        expected: BTreeSet<PolygonId>,
        actual: BTreeSet<PolygonId>,
    },
    PolygonTooSmall { polygon: PolygonId, vertices: usize },
    PolygonDanglingVertex { polygon: PolygonId, point: PointId },
    LineDanglingPoint { line: LineId, point: PointId },
    /// Start/end point no longer sits at the line position.
    LineEndMismatch { line: LineId, point: PointId },
    /// A waypoint that is also the line's start or end.
    WaypointIsEnd { line: LineId, point: PointId },
    DuplicateWaypoint { line: LineId, point: PointId },
    /// `Point::line_id` names a missing line or one that does not link back.
    PointLineRef { point: PointId, line: LineId },
    NoteDanglingLink { note: NoteId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PolygonBackRef { point, expected, actual } => write!(
                f,
                "point {point} lists polygons {actual:?}, expected {expected:?}"
            ),
            Violation::PolygonTooSmall { polygon, vertices } => {
                write!(f, "polygon {polygon} has only {vertices} vertices")
            }
            Violation::PolygonDanglingVertex { polygon, point } => {
                write!(f, "polygon {polygon} references missing point {point}")
            }
            Violation::LineDanglingPoint { line, point } => {
                write!(f, "line {line} references missing point {point}")
            }
            Violation::LineEndMismatch { line, point } => {
                write!(f, "line {line} end point {point} does not match its position")
            }
            Violation::WaypointIsEnd { line, point } => {
                write!(f, "line {line} lists end point {point} as a waypoint")
            }
            Violation::DuplicateWaypoint { line, point } => {
                write!(f, "line {line} lists waypoint {point} more than once")
            }
            Violation::PointLineRef { point, line } => {
                write!(f, "point {point} claims line {line}, which does not link back")
            }
            Violation::NoteDanglingLink { note } => write!(f, "note {note} links to a missing element"),
        }
    }
}

impl ElementGraph {
    /// All invariant violations; empty for a well-formed graph.
    pub fn check_invariants(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        let tol = self.cfg.tolerance_deg;

        for polygon in self.polygons.values() {
            if polygon.point_ids.len() < MIN_POLYGON_VERTICES {
                out.push(Violation::PolygonTooSmall {
                    polygon: polygon.id.clone(),
                    vertices: polygon.point_ids.len(),
                });
            }
            for pid in &polygon.point_ids {
                if !self.points.contains(pid) {
                    out.push(Violation::PolygonDanglingVertex {
                        polygon: polygon.id.clone(),
                        point: pid.clone(),
                    });
                }
            }
        }

        for point in self.points.values() {
            let expected: BTreeSet<PolygonId> = self
                .polygons
                .values()
                .filter(|p| p.point_ids.contains(&point.id))
                .map(|p| p.id.clone())
                .collect();
            if expected != point.polygon_ids {
                out.push(Violation::PolygonBackRef {
                    point: point.id.clone(),
                    expected,
                    actual: point.polygon_ids.clone(),
                });
            }
            if let Some(lid) = &point.line_id {
                let links_back = self
                    .lines
                    .get(lid)
                    .is_some_and(|l| l.references_point(&point.id));
                if !links_back {
                    out.push(Violation::PointLineRef {
                        point: point.id.clone(),
                        line: lid.clone(),
                    });
                }
            }
        }

        for line in self.lines.values() {
            for pid in line.linked_points() {
                if !self.points.contains(&pid) {
                    out.push(Violation::LineDanglingPoint {
                        line: line.id.clone(),
                        point: pid,
                    });
                }
            }
            for (i, pid) in line.points_on_line.iter().enumerate() {
                let is_end = line.start_point_id.as_ref() == Some(pid)
                    || line.end_point_id.as_ref() == Some(pid);
                if is_end {
                    out.push(Violation::WaypointIsEnd {
                        line: line.id.clone(),
                        point: pid.clone(),
                    });
                }
                if line.points_on_line[..i].contains(pid) {
                    out.push(Violation::DuplicateWaypoint {
                        line: line.id.clone(),
                        point: pid.clone(),
                    });
                }
            }
            let ends = [
                (line.start_point_id.as_ref(), Some(line.center)),
                (line.end_point_id.as_ref(), line.endpoint),
            ];
            for (pid, at) in ends {
                let (Some(pid), Some(point)) = (pid, pid.and_then(|p| self.points.get(p))) else {
                    continue;
                };
                if !at.is_some_and(|at| point.coordinates.matches(&at, tol)) {
                    out.push(Violation::LineEndMismatch {
                        line: line.id.clone(),
                        point: pid.clone(),
                    });
                }
            }
        }

        for note in self.notes.values() {
            if let Some(link) = &note.link {
                if !self.link_target_exists(link) {
                    out.push(Violation::NoteDanglingLink {
                        note: note.id.clone(),
                    });
                }
            }
        }
        out
    }
}
