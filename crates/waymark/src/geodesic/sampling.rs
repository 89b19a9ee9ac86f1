//! Point sets for drawing: circles, straight map lines, parallels.

use super::projection::{project, unproject};
use super::sphere::destination_point;
use super::types::LatLon;

/// `num_points` points at constant geodesic radius, evenly spaced by bearing
/// starting due north, followed by a copy of the first point to close the ring.
/// `num_points == 0` yields an empty ring.
pub fn generate_circle(center: LatLon, radius_km: f64, num_points: usize) -> Vec<LatLon> {
    if num_points == 0 {
        return Vec::new();
    }
    let step = 360.0 / num_points as f64;
    let mut ring: Vec<LatLon> = (0..num_points)
        .map(|i| destination_point(center, radius_km, i as f64 * step))
        .collect();
    ring.push(ring[0]);
    ring
}

/// `num_points + 1` points interpolated linearly in Web Mercator between
/// `start` and `end`, both included exactly. Matches how the map renders a
/// straight segment; this is not a great-circle path.
pub fn generate_line_points_linear(start: LatLon, end: LatLon, num_points: usize) -> Vec<LatLon> {
    if num_points == 0 {
        return vec![start];
    }
    let a = project(start);
    let b = project(end);
    let n = num_points as f64;
    let mut out = Vec::with_capacity(num_points + 1);
    out.push(start);
    for i in 1..num_points {
        let t = i as f64 / n;
        out.push(unproject(a + (b - a) * t));
    }
    out.push(end);
    out
}

/// Constant-latitude polyline spanning longitudes -180..=180 with
/// `num_points + 1` samples (at least the two ends).
pub fn parallel_points(latitude: f64, num_points: usize) -> Vec<LatLon> {
    let n = num_points.max(1);
    let step = 360.0 / n as f64;
    (0..=n)
        .map(|i| LatLon::new(latitude, -180.0 + i as f64 * step))
        .collect()
}
