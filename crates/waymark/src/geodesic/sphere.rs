//! Great-circle forward/inverse formulas on the 6371 km sphere.

use super::types::{LatLon, EARTH_RADIUS_KM};

/// Wrap any bearing into `[0, 360)`.
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = (deg % 360.0 + 360.0) % 360.0;
    // (-tiny + 360) rounds to 360.0
    if b >= 360.0 {
        0.0
    } else {
        b
    }
}

/// Wrap any longitude into `[-180, 180]`; values already in range are returned unchanged.
#[inline]
pub fn normalize_longitude(deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&deg) {
        return deg;
    }
    (deg + 540.0).rem_euclid(360.0) - 180.0
}

/// Point reached by travelling `distance_km` from `origin` along the great
/// circle leaving at `bearing_deg`.
pub fn destination_point(origin: LatLon, distance_km: f64, bearing_deg: f64) -> LatLon {
    if distance_km == 0.0 {
        return origin;
    }
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    LatLon::new(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// Initial great-circle bearing from `from` towards `to`, in `[0, 360)`.
pub fn calculate_bearing(from: LatLon, to: LatLon) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_lambda = (to.lon - from.lon).to_radians();
    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    normalize_bearing(y.atan2(x).to_degrees())
}

/// Bearing from `to` back towards `from`.
#[inline]
pub fn calculate_inverse_bearing(from: LatLon, to: LatLon) -> f64 {
    calculate_bearing(to, from)
}

/// Haversine distance in km.
pub fn geodesic_distance_km(a: LatLon, b: LatLon) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (b.lon - a.lon).to_radians();
    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
