//! Persistence format: `{ circles, lineSegments, points, polygons, notes }`.
//!
//! Every collection and every reference field is optional on input so that
//! snapshots written before the bidirectional fields existed still load.
//! Line records keep the flat, mode-dependent field set of the format; the
//! parallel latitude travels in the historical `longitude` field.

use serde::{Deserialize, Serialize};

use super::ids::{CircleId, ElementId, LineId, NoteId, PointId, PolygonId};
use super::types::{Circle, ElementKind, LineGeometry, LineMode, LineSegment, Note, NoteLink, Point, Polygon};
use crate::geodesic::LatLon;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    #[serde(default)]
    pub circles: Vec<CircleRecord>,
    #[serde(default)]
    pub line_segments: Vec<LineRecord>,
    #[serde(default)]
    pub points: Vec<PointRecord>,
    #[serde(default)]
    pub polygons: Vec<PolygonRecord>,
    #[serde(default)]
    pub notes: Vec<NoteRecord>,
}

impl LayerSnapshot {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub id: PointId,
    #[serde(default)]
    pub name: String,
    pub coordinates: LatLon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<LineId>,
    #[serde(default)]
    pub polygon_ids: Vec<PolygonId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    pub id: LineId,
    #[serde(default)]
    pub name: String,
    pub center: LatLon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<LineMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<LatLon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
    /// Latitude of a parallel-mode line (historical field name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersection_point: Option<LatLon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersection_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point_id: Option<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point_id: Option<PointId>,
    #[serde(default)]
    pub points_on_line: Vec<PointId>,
}

impl LineRecord {
    /// Typed geometry. An explicit mode wins when its parameters are present;
    /// otherwise the mode is inferred from whichever fields exist, falling back
    /// to the stored endpoint. `None` when nothing usable is stored.
    pub fn geometry(&self) -> Option<LineGeometry> {
        let intersection = self.intersection_point.and_then(|via| {
            self.intersection_distance
                .or(self.distance)
                .map(|d| LineGeometry::Intersection { via, distance_km: d })
        });
        let azimuth = match (self.distance, self.azimuth) {
            (Some(distance_km), Some(azimuth_deg)) => Some(LineGeometry::Azimuth {
                distance_km,
                azimuth_deg,
            }),
            _ => None,
        };
        let coordinate = self.endpoint.map(|endpoint| LineGeometry::Coordinate { endpoint });
        let parallel = self.longitude.map(|latitude| LineGeometry::Parallel { latitude });

        let explicit = match self.mode {
            Some(LineMode::Coordinate) => coordinate,
            Some(LineMode::Azimuth) => azimuth,
            Some(LineMode::Intersection) => intersection,
            Some(LineMode::Parallel) => parallel,
            None => None,
        };
        explicit
            .or(intersection)
            .or(azimuth)
            .or(coordinate)
            .or(parallel)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonRecord {
    pub id: PolygonId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub point_ids: Vec<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_element_type: Option<ElementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_element_id: Option<ElementId>,
}

impl NoteRecord {
    pub fn link(&self) -> Option<NoteLink> {
        let kind = self.linked_element_type?;
        let id = self.linked_element_id.as_ref()?;
        NoteLink::from_parts(kind, id.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleRecord {
    pub id: CircleId,
    #[serde(default)]
    pub name: String,
    pub center: LatLon,
    /// Radius in km.
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<&Point> for PointRecord {
    fn from(p: &Point) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            coordinates: p.coordinates,
            elevation: p.elevation,
            color: p.color.clone(),
            line_id: p.line_id.clone(),
            polygon_ids: p.polygon_ids.iter().cloned().collect(),
        }
    }
}

impl From<&LineSegment> for LineRecord {
    fn from(l: &LineSegment) -> Self {
        let mut rec = LineRecord {
            id: l.id.clone(),
            name: l.name.clone(),
            center: l.center,
            mode: Some(l.mode()),
            endpoint: l.endpoint,
            distance: None,
            azimuth: None,
            longitude: None,
            intersection_point: None,
            intersection_distance: None,
            color: l.color.clone(),
            start_point_id: l.start_point_id.clone(),
            end_point_id: l.end_point_id.clone(),
            points_on_line: l.points_on_line.clone(),
        };
        match l.geometry {
            LineGeometry::Coordinate { .. } => {}
            LineGeometry::Azimuth {
                distance_km,
                azimuth_deg,
            } => {
                rec.distance = Some(distance_km);
                rec.azimuth = Some(azimuth_deg);
            }
            LineGeometry::Intersection { via, distance_km } => {
                rec.intersection_point = Some(via);
                rec.intersection_distance = Some(distance_km);
                rec.distance = Some(distance_km);
            }
            LineGeometry::Parallel { latitude } => {
                rec.longitude = Some(latitude);
            }
        }
        rec
    }
}

impl From<&Polygon> for PolygonRecord {
    fn from(p: &Polygon) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            point_ids: p.point_ids.clone(),
            color: p.color.clone(),
        }
    }
}

impl From<&Note> for NoteRecord {
    fn from(n: &Note) -> Self {
        Self {
            id: n.id.clone(),
            title: n.title.clone(),
            content: n.content.clone(),
            linked_element_type: n.link.as_ref().map(NoteLink::kind),
            linked_element_id: n.link.as_ref().map(|l| ElementId::from(l.id_str())),
        }
    }
}

impl From<&Circle> for CircleRecord {
    fn from(c: &Circle) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            center: c.center,
            radius: c.radius_km,
            color: c.color.clone(),
            extra: c.extra.clone(),
        }
    }
}

impl From<CircleRecord> for Circle {
    fn from(r: CircleRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            center: r.center,
            radius_km: r.radius,
            color: r.color,
            extra: r.extra,
        }
    }
}
