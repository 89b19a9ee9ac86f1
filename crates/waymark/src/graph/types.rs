//! Entities of the element graph plus their drafts and sparse patches.
//!
//! - Entities (`Point`, `LineSegment`, `Polygon`, `Note`, `Circle`) are only
//!   handed out by shared reference; the graph owns every mutation.
//! - Drafts describe an entity to add (id optional, references excluded).
//! - Patches are sparse updates: only `Some` fields are applied.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{CircleId, LineId, NoteId, PointId, PolygonId};
use crate::geodesic::{
    destination_point, endpoint_from_intersection_with_cfg, generate_line_points_linear,
    parallel_points, GeodesicCfg, LatLon,
};

/// Graph configuration.
#[derive(Clone, Copy, Debug)]
pub struct GraphCfg {
    /// Coordinate-match tolerance in degrees (per axis) for automatic links.
    pub tolerance_deg: f64,
    /// Tolerances for intersection-mode endpoints.
    pub geodesic: GeodesicCfg,
}

impl Default for GraphCfg {
    fn default() -> Self {
        Self {
            tolerance_deg: 1e-4,
            geodesic: GeodesicCfg::default(),
        }
    }
}

/// Entity kind, as written in note links and error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Point,
    #[serde(alias = "line")]
    LineSegment,
    Polygon,
    Note,
    Circle,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Point => "point",
            ElementKind::LineSegment => "line segment",
            ElementKind::Polygon => "polygon",
            ElementKind::Note => "note",
            ElementKind::Circle => "circle",
        })
    }
}

/// A map point; the only entity that owns vertex coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub name: String,
    pub coordinates: LatLon,
    pub elevation: Option<f64>,
    pub color: Option<String>,
    /// Most recent line this point was linked to (start, end or on-line).
    pub line_id: Option<LineId>,
    /// Polygons using this point as a vertex.
    pub polygon_ids: BTreeSet<PolygonId>,
}

/// Construction mode of a line segment, without its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    #[serde(alias = "coordinates")]
    Coordinate,
    Azimuth,
    Intersection,
    Parallel,
}

/// How a line's far end is determined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineGeometry {
    /// Explicit endpoint.
    Coordinate { endpoint: LatLon },
    /// Great-circle destination from the center.
    Azimuth { distance_km: f64, azimuth_deg: f64 },
    /// Map-straight ray from the center through `via`, stopped at `distance_km`.
    Intersection { via: LatLon, distance_km: f64 },
    /// Constant-latitude line around the whole globe; no endpoint.
    Parallel { latitude: f64 },
}

impl LineGeometry {
    pub fn mode(&self) -> LineMode {
        match self {
            LineGeometry::Coordinate { .. } => LineMode::Coordinate,
            LineGeometry::Azimuth { .. } => LineMode::Azimuth,
            LineGeometry::Intersection { .. } => LineMode::Intersection,
            LineGeometry::Parallel { .. } => LineMode::Parallel,
        }
    }

    /// Far end for a line starting at `center`; `None` for parallels.
    pub fn resolve_endpoint(&self, center: LatLon, cfg: GeodesicCfg) -> Option<LatLon> {
        match *self {
            LineGeometry::Coordinate { endpoint } => Some(endpoint),
            LineGeometry::Azimuth {
                distance_km,
                azimuth_deg,
            } => Some(destination_point(center, distance_km, azimuth_deg)),
            LineGeometry::Intersection { via, distance_km } => Some(
                endpoint_from_intersection_with_cfg(center, via, distance_km, cfg),
            ),
            LineGeometry::Parallel { .. } => None,
        }
    }
}

/// A line segment anchored at `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub id: LineId,
    pub name: String,
    pub center: LatLon,
    pub geometry: LineGeometry,
    /// Endpoint resolved from `geometry` at the last add/update.
    pub endpoint: Option<LatLon>,
    pub color: Option<String>,
    /// Point coincident with `center`.
    pub start_point_id: Option<PointId>,
    /// Point coincident with `endpoint`.
    pub end_point_id: Option<PointId>,
    /// Waypoints along the line, excluding start and end.
    pub points_on_line: Vec<PointId>,
}

impl LineSegment {
    #[inline]
    pub fn mode(&self) -> LineMode {
        self.geometry.mode()
    }

    /// True if `point` is this line's start, end or one of its waypoints.
    pub fn references_point(&self, point: &PointId) -> bool {
        self.start_point_id.as_ref() == Some(point)
            || self.end_point_id.as_ref() == Some(point)
            || self.points_on_line.contains(point)
    }

    /// Every point id this line links to, start first, without duplicates.
    pub fn linked_points(&self) -> Vec<PointId> {
        let mut out: Vec<PointId> = Vec::new();
        let ends = self.start_point_id.iter().chain(self.end_point_id.iter());
        for id in ends.chain(self.points_on_line.iter()) {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// Polyline to draw: `samples + 1` map-straight points, or the full parallel.
    pub fn render_points(&self, samples: usize) -> Vec<LatLon> {
        match (self.geometry, self.endpoint) {
            (LineGeometry::Parallel { latitude }, _) => parallel_points(latitude, samples),
            (_, Some(end)) => generate_line_points_linear(self.center, end, samples),
            (_, None) => vec![self.center],
        }
    }
}

/// A simple polygon whose boundary is the ordered list of its vertex points.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub id: PolygonId,
    pub name: String,
    pub point_ids: Vec<PointId>,
    pub color: Option<String>,
}

/// The one entity a note is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NoteLink {
    Point(PointId),
    Line(LineId),
    Polygon(PolygonId),
    Circle(CircleId),
}

impl NoteLink {
    pub fn kind(&self) -> ElementKind {
        match self {
            NoteLink::Point(_) => ElementKind::Point,
            NoteLink::Line(_) => ElementKind::LineSegment,
            NoteLink::Polygon(_) => ElementKind::Polygon,
            NoteLink::Circle(_) => ElementKind::Circle,
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            NoteLink::Point(id) => id.as_str(),
            NoteLink::Line(id) => id.as_str(),
            NoteLink::Polygon(id) => id.as_str(),
            NoteLink::Circle(id) => id.as_str(),
        }
    }

    /// Rebuild a link from its wire form; `None` for kinds a note cannot target.
    pub fn from_parts(kind: ElementKind, id: &str) -> Option<Self> {
        match kind {
            ElementKind::Point => Some(NoteLink::Point(id.into())),
            ElementKind::LineSegment => Some(NoteLink::Line(id.into())),
            ElementKind::Polygon => Some(NoteLink::Polygon(id.into())),
            ElementKind::Circle => Some(NoteLink::Circle(id.into())),
            ElementKind::Note => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub link: Option<NoteLink>,
}

/// Range ring. Stored and persisted as-is; nothing links to a circle except notes.
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub id: CircleId,
    pub name: String,
    pub center: LatLon,
    pub radius_km: f64,
    pub color: Option<String>,
    /// Snapshot fields this crate does not interpret, carried through unchanged.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// --- drafts ---

#[derive(Clone, Debug, PartialEq)]
pub struct PointDraft {
    pub id: Option<PointId>,
    pub name: String,
    pub coordinates: LatLon,
    pub elevation: Option<f64>,
    pub color: Option<String>,
}

impl PointDraft {
    pub fn new(name: impl Into<String>, coordinates: LatLon) -> Self {
        Self {
            id: None,
            name: name.into(),
            coordinates,
            elevation: None,
            color: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<PointId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineDraft {
    pub id: Option<LineId>,
    pub name: String,
    pub center: LatLon,
    pub geometry: LineGeometry,
    pub color: Option<String>,
    pub points_on_line: Vec<PointId>,
    /// Create a point at the resolved endpoint when none sits there yet.
    pub create_endpoint_point: bool,
}

impl LineDraft {
    pub fn new(name: impl Into<String>, center: LatLon, geometry: LineGeometry) -> Self {
        Self {
            id: None,
            name: name.into(),
            center,
            geometry,
            color: None,
            points_on_line: Vec::new(),
            create_endpoint_point: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<LineId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonDraft {
    pub id: Option<PolygonId>,
    pub name: String,
    pub point_ids: Vec<PointId>,
    pub color: Option<String>,
}

impl PolygonDraft {
    pub fn new(name: impl Into<String>, point_ids: Vec<PointId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            point_ids,
            color: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<PolygonId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteDraft {
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    pub link: Option<NoteLink>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            link: None,
        }
    }

    pub fn linked_to(mut self, link: NoteLink) -> Self {
        self.link = Some(link);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircleDraft {
    pub id: Option<CircleId>,
    pub name: String,
    pub center: LatLon,
    pub radius_km: f64,
    pub color: Option<String>,
}

impl CircleDraft {
    pub fn new(name: impl Into<String>, center: LatLon, radius_km: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            center,
            radius_km,
            color: None,
        }
    }
}

// --- patches ---

/// Sparse point update. `Some(None)` clears an optional field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointPatch {
    pub name: Option<String>,
    pub coordinates: Option<LatLon>,
    pub elevation: Option<Option<f64>>,
    pub color: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinePatch {
    pub name: Option<String>,
    pub center: Option<LatLon>,
    pub geometry: Option<LineGeometry>,
    pub color: Option<Option<String>>,
    pub points_on_line: Option<Vec<PointId>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonPatch {
    pub name: Option<String>,
    pub point_ids: Option<Vec<PointId>>,
    pub color: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub link: Option<Option<NoteLink>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CirclePatch {
    pub name: Option<String>,
    pub center: Option<LatLon>,
    pub radius_km: Option<f64>,
    pub color: Option<Option<String>>,
}

// --- results ---

/// Entity counts, for callers that derive default names ("Point 3").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElementCounts {
    pub points: usize,
    pub lines: usize,
    pub polygons: usize,
    pub notes: usize,
    pub circles: usize,
}

/// What `delete_point` removed or touched.
#[derive(Clone, Debug, PartialEq)]
pub struct PointDeletion {
    pub point: Point,
    /// Lines that lost this point as start, end or waypoint.
    pub detached_lines: Vec<LineId>,
    /// Polygons that kept 3+ vertices and need redrawing.
    pub shrunk_polygons: Vec<PolygonId>,
    /// Polygons removed because they fell below 3 vertices.
    pub deleted_polygons: Vec<Polygon>,
    pub deleted_notes: Vec<NoteId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineDeletion {
    pub line: LineSegment,
    /// Points whose `line_id` was cleared.
    pub unlinked_points: Vec<PointId>,
    pub deleted_notes: Vec<NoteId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonDeletion {
    pub polygon: Polygon,
    pub deleted_notes: Vec<NoteId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircleDeletion {
    pub circle: Circle,
    pub deleted_notes: Vec<NoteId>,
}
