//! Coordinates and solver tolerances.
//!
//! - `LatLon`: decimal-degree position, serialized as `{lat, lon}`.
//! - `GeodesicCfg`: centralizes the caps and thresholds of the intersection solver.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every spherical formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Largest per-axis difference in degrees (box metric).
    #[inline]
    pub fn max_abs_diff(&self, other: &LatLon) -> f64 {
        (self.lat - other.lat).abs().max((self.lon - other.lon).abs())
    }

    /// True when both axes differ by less than `tolerance` degrees.
    #[inline]
    pub fn matches(&self, other: &LatLon, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() < tolerance && (self.lon - other.lon).abs() < tolerance
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// Solver configuration (caps and tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeodesicCfg {
    /// Requested distance within this many km of the intersection distance counts as an exact hit.
    pub exact_hit_km: f64,
    /// Bisection stops once `|f(mid)|` drops below this (km).
    pub tol_km: f64,
    /// Bisection stops once the bracket is narrower than this (projected metres).
    pub min_bracket_m: f64,
    /// Upper cap for the growing bracket (projected metres).
    pub max_offset_m: f64,
    pub max_doublings: usize,
    pub max_bisections: usize,
    /// Start and intersection closer than this (projected metres) form a degenerate ray.
    pub eps_degenerate_m: f64,
}

impl Default for GeodesicCfg {
    fn default() -> Self {
        Self {
            exact_hit_km: 1e-6,
            tol_km: 1e-6,
            min_bracket_m: 0.01,
            max_offset_m: 40_000_000.0,
            max_doublings: 60,
            max_bisections: 60,
            eps_degenerate_m: 1e-9,
        }
    }
}
