//! Geodesic computation and a consistent element graph for map editing.
//!
//! - `geodesic`: pure spherical math (bearings, destinations, circles,
//!   map-straight sampling, the intersection-mode endpoint solver).
//! - `graph`: the owned store of points, lines, polygons, notes and circles
//!   that keeps cross references correct and cascades deletions.
//!
//! Nothing here renders, persists or does I/O; callers pass raw values in and
//! get finalized entities back.

pub mod api;
pub mod geodesic;
pub mod graph;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geodesic::{GeodesicCfg, LatLon};
pub use graph::{ElementGraph, GraphCfg, GraphError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geodesic::{
        calculate_bearing, destination_point, endpoint_from_intersection, generate_circle,
        geodesic_distance_km, GeodesicCfg, LatLon,
    };
    pub use crate::graph::{
        ElementGraph, GraphCfg, GraphError, LineDraft, LineGeometry, NoteDraft, NoteLink,
        PointDraft, PolygonDraft,
    };
}
