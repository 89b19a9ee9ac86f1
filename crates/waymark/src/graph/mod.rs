//! Element graph: points, line segments, polygons, notes and circles, with
//! their cross references kept consistent on every mutation.
//!
//! Purpose
//! - Own the entity tables and expose the only operations allowed to change
//!   them, so the reference invariants cannot be bypassed.
//! - Auto-link points to lines by coordinate proximity (explicit tolerance,
//!   see `GraphCfg::tolerance_deg`) and cascade deletions without leaving
//!   dangling ids.
//!
//! Invariants (after every mutation)
//! - `Point::polygon_ids` equals the set of polygons listing the point.
//! - Line start/end ids name points at the line's center/endpoint.
//! - A polygon has at least 3 vertices; it is deleted rather than shrunk below.
//! - Deleting a point, line, polygon or circle deletes the notes linked to it.
//!
//! Layout
//! - `store.rs` (tables, queries, points), `lines.rs`, `polygons.rs`,
//!   `notes.rs` (notes and circles), `repair.rs` (snapshot import/export),
//!   `check.rs` (invariant self-check).

mod check;
mod error;
mod ids;
mod lines;
mod notes;
mod polygons;
mod repair;
pub mod snapshot;
mod store;
mod table;
mod types;

pub use check::Violation;
pub use error::{GraphError, Result};
pub use ids::{CircleId, ElementId, LineId, NoteId, PointId, PolygonId};
pub use polygons::MIN_POLYGON_VERTICES;
pub use repair::RepairReport;
pub use snapshot::LayerSnapshot;
pub use store::ElementGraph;
pub use types::{
    Circle, CircleDeletion, CircleDraft, CirclePatch, ElementCounts, ElementKind, GraphCfg,
    LineDeletion, LineDraft, LineGeometry, LineMode, LinePatch, LineSegment, Note, NoteDraft,
    NoteLink, NotePatch, Point, PointDeletion, PointDraft, PointPatch, Polygon, PolygonDeletion,
    PolygonDraft, PolygonPatch,
};

#[cfg(test)]
mod tests_repair;
