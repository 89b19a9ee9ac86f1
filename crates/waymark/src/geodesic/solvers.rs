//! Intersection-mode endpoint solver.
//!
//! Problem
//! - Find E on the projected ray from `start` through `via` such that the
//!   geodesic distance `start → E` equals the requested distance.
//! - The ray is straight in Web Mercator, the distance is measured on the
//!   sphere, so there is no closed form; we bracket then bisect on the ray
//!   offset `s` (projected metres).
//!
//! Fallbacks (never errors)
//! - Degenerate ray (`via` projects onto `start`): walk due east.
//! - Requested distance shorter than the distance to `via`: return `via`.
//! - Bracket growth hits the cap: return the farthest point tried.

use nalgebra::Vector2;

use super::projection::{project, unproject};
use super::sphere::{geodesic_distance_km, normalize_longitude};
use super::types::{GeodesicCfg, LatLon};

/// [`endpoint_from_intersection_with_cfg`] with default tolerances.
pub fn endpoint_from_intersection(start: LatLon, via: LatLon, distance_km: f64) -> LatLon {
    endpoint_from_intersection_with_cfg(start, via, distance_km, GeodesicCfg::default())
}

/// Endpoint at geodesic `distance_km` from `start` on the map-straight ray through `via`.
pub fn endpoint_from_intersection_with_cfg(
    start: LatLon,
    via: LatLon,
    distance_km: f64,
    cfg: GeodesicCfg,
) -> LatLon {
    let origin = project(start);
    let offset = project(via) - origin;
    let norm = offset.norm();
    let (dir, s_via) = if norm.is_finite() && norm > cfg.eps_degenerate_m {
        (offset / norm, norm)
    } else {
        tracing::warn!(?start, ?via, "degenerate intersection ray, walking east");
        (Vector2::new(1.0, 0.0), 0.0)
    };

    let point_at = |s: f64| -> LatLon {
        let p = unproject(origin + dir * s);
        LatLon::new(p.lat, normalize_longitude(p.lon))
    };
    let f = |s: f64| geodesic_distance_km(start, point_at(s)) - distance_km;

    let via_km = geodesic_distance_km(start, via);
    if (via_km - distance_km).abs() < cfg.exact_hit_km {
        return via;
    }
    if f(s_via) > 0.0 {
        tracing::warn!(
            distance_km,
            via_km,
            "requested distance is shorter than the intersection, returning intersection"
        );
        return via;
    }

    // Grow the upper bound until f changes sign.
    let mut s_low = s_via;
    let mut s_high = (2.0 * s_via).max(1.0).min(cfg.max_offset_m).max(s_low);
    let mut bracketed = false;
    for _ in 0..cfg.max_doublings {
        if f(s_high) >= 0.0 {
            bracketed = true;
            break;
        }
        if s_high >= cfg.max_offset_m {
            break;
        }
        s_low = s_high;
        s_high = (s_high * 2.0).min(cfg.max_offset_m);
    }
    if !bracketed {
        tracing::warn!(distance_km, s_high, "could not bracket endpoint, using farthest offset");
        return point_at(s_high);
    }

    let (mut lo, mut hi) = (s_low, s_high);
    let mut mid = 0.5 * (lo + hi);
    let mut iterations = 0;
    for _ in 0..cfg.max_bisections {
        iterations += 1;
        mid = 0.5 * (lo + hi);
        let fm = f(mid);
        if fm.abs() < cfg.tol_km || hi - lo < cfg.min_bracket_m {
            break;
        }
        if fm < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    tracing::trace!(iterations, offset_m = mid, "intersection endpoint converged");
    point_at(mid)
}
