// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Coordinates
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Spherical ↔ Cartesian conversions and the local vertical/east/north frame.
//!
//! Latitudes are measured from the equator (not colatitude). The Cartesian
//! frame is Earth-centred with +z through the geographic north pole and +x
//! through longitude 0.

use geomag_types::constants::EARTH_RADIUS_M;
use geomag_types::state::Record;

use crate::vec3::{cross, Vec3};

/// Convert `(r, latitude, longitude)` (radians) to Cartesian `(x, y, z)`.
pub fn spherical_to_cartesian(r: f64, lat: f64, lon: f64) -> Vec3 {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    [r * cos_lat * cos_lon, r * cos_lat * sin_lon, r * sin_lat]
}

/// Convert Cartesian `(x, y, z)` to `(r, latitude, longitude)`.
///
/// Longitude lies in `(-π, π]`. The origin maps to NaN latitude.
pub fn cartesian_to_spherical(xyz: Vec3) -> (f64, f64, f64) {
    let r = (xyz[0] * xyz[0] + xyz[1] * xyz[1] + xyz[2] * xyz[2]).sqrt();
    let lat = (xyz[2] / r).asin();
    (r, lat, xyz[1].atan2(xyz[0]))
}

/// Position of a point given in degrees and metres above the mean radius.
pub fn geographic_to_cartesian(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Vec3 {
    spherical_to_cartesian(
        EARTH_RADIUS_M + alt_m,
        lat_deg.to_radians(),
        lon_deg.to_radians(),
    )
}

/// Cartesian position of an accepted survey record.
pub fn record_position(record: &Record) -> Vec3 {
    spherical_to_cartesian(
        EARTH_RADIUS_M + record.altitude,
        record.latitude,
        record.longitude,
    )
}

/// Local unit frame at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub vertical: Vec3,
    pub east: Vec3,
    pub north: Vec3,
}

impl LocalFrame {
    /// Frame at `(lat, lon)` in radians: radial up, east, and `vertical × east`.
    pub fn at(lat: f64, lon: f64) -> Self {
        let vertical = spherical_to_cartesian(1.0, lat, lon);
        let east = [-lon.sin(), lon.cos(), 0.0];
        let north = cross(vertical, east);
        LocalFrame {
            vertical,
            east,
            north,
        }
    }

    /// Compose a Cartesian vector from local vertical/east/north components.
    pub fn compose(&self, vertical: f64, east: f64, north: f64) -> Vec3 {
        [
            self.vertical[0] * vertical + self.east[0] * east + self.north[0] * north,
            self.vertical[1] * vertical + self.east[1] * east + self.north[1] * north,
            self.vertical[2] * vertical + self.east[2] * east + self.north[2] * north,
        ]
    }
}
