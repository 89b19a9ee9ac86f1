//! Web Mercator (EPSG:3857), the flat projection the map draws in.

use nalgebra::Vector2;

use super::types::LatLon;

/// Spherical Mercator radius in metres.
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;
/// Latitude at which the square Mercator world is cut off.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Project to metres: `x` east, `y` north. Latitude is clamped to the Mercator range.
#[inline]
pub fn project(p: LatLon) -> Vector2<f64> {
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = MERCATOR_RADIUS_M * p.lon.to_radians();
    let y = MERCATOR_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Vector2::new(x, y)
}

/// Inverse of [`project`]. Longitude is not wrapped.
#[inline]
pub fn unproject(v: Vector2<f64>) -> LatLon {
    let lon = (v.x / MERCATOR_RADIUS_M).to_degrees();
    let lat = (2.0 * (v.y / MERCATOR_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LatLon::new(lat, lon)
}
