//! Spherical geodesy for map editing.
//!
//! Purpose
//! - Turn user-level intents ("5 km on bearing 45°", "stop where the ray
//!   through this location reaches 12 km") into coordinates.
//! - Stay stateless: every function is pure and takes plain `LatLon` values,
//!   so both the element graph and external drawing code can call it.
//!
//! Model
//! - Great-circle math on a sphere of radius 6371 km; distances in km,
//!   bearings in degrees clockwise from north in `[0, 360)`.
//! - "Straight" on the map means straight in Web Mercator (EPSG:3857), which
//!   is why line sampling and the intersection solver work in projected metres.
//!
//! Code cross-refs: `solvers::endpoint_from_intersection`, `graph::LineGeometry`.

pub mod projection;
mod sampling;
mod solvers;
mod sphere;
mod types;

pub use projection::{project, unproject, MAX_MERCATOR_LAT, MERCATOR_RADIUS_M};
pub use sampling::{generate_circle, generate_line_points_linear, parallel_points};
pub use solvers::{endpoint_from_intersection, endpoint_from_intersection_with_cfg};
pub use sphere::{
    calculate_bearing, calculate_inverse_bearing, destination_point, geodesic_distance_km,
    normalize_bearing, normalize_longitude,
};
pub use types::{GeodesicCfg, LatLon, EARTH_RADIUS_KM};
