// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Loop Field
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Magnetic field of an equatorial current loop via discretised Biot–Savart.
//!
//! The loop lies in the z = 0 plane, centred on the Earth's centre, and is
//! split into `LOOP_SEGMENTS` straight pieces. Segment k runs from
//! `R·(cos kΔ, sin kΔ, 0)` to `R·(cos (k+1)Δ, sin (k+1)Δ, 0)` with Δ = 2π/n,
//! and contributes
//!
//!   dB = (μ₀ I / 4π) · (dl × r) / |r|³,   r = P − P₁
//!
//! NOTE: r is measured from the segment START point, not its midpoint.
//! Calibrated radii and currents are tied to this exact discretisation.

use std::f64::consts::PI;

use geomag_math::coords::geographic_to_cartesian;
use geomag_math::vec3::{add, cross, dot, norm, scale, sub, Vec3};
use geomag_types::constants::{LOOP_SEGMENTS, MU0};

/// Polygonal current loop with precomputed segment geometry.
#[derive(Debug, Clone)]
pub struct CurrentLoop {
    pub current: f64,
    pub radius: f64,
    starts: Vec<Vec3>,
    segments: Vec<Vec3>,
}

impl CurrentLoop {
    pub fn new(current: f64, radius: f64) -> Self {
        let step = 2.0 * PI / LOOP_SEGMENTS as f64;
        let vertex = |k: usize| {
            let (s, c) = (k as f64 * step).sin_cos();
            [c * radius, s * radius, 0.0]
        };

        let mut starts = Vec::with_capacity(LOOP_SEGMENTS);
        let mut segments = Vec::with_capacity(LOOP_SEGMENTS);
        for k in 0..LOOP_SEGMENTS {
            let p1 = vertex(k);
            let p2 = vertex(k + 1);
            starts.push(p1);
            segments.push(sub(p2, p1));
        }

        CurrentLoop {
            current,
            radius,
            starts,
            segments,
        }
    }

    /// Field [T] at a Cartesian observation point [m].
    pub fn field_at_point(&self, p: Vec3) -> Vec3 {
        let prefactor = MU0 * self.current / (4.0 * PI);
        let mut b = [0.0; 3];
        for (p1, dl) in self.starts.iter().zip(&self.segments) {
            let r = sub(p, *p1);
            let r_norm = norm(r);
            let contrib = scale(cross(*dl, r), prefactor / (r_norm * r_norm * r_norm));
            b = add(b, contrib);
        }
        b
    }

    /// Field [T] at a geographic point (degrees, metres above mean radius).
    pub fn field_at(&self, lon_deg: f64, lat_deg: f64, alt_m: f64) -> Vec3 {
        self.field_at_point(geographic_to_cartesian(lon_deg, lat_deg, alt_m))
    }
}

/// Predicted field [T] of a loop with `current` [A] and `radius` [m].
pub fn field_at(lon_deg: f64, lat_deg: f64, alt_m: f64, current: f64, radius: f64) -> Vec3 {
    CurrentLoop::new(current, radius).field_at(lon_deg, lat_deg, alt_m)
}

/// Angle [deg] between `field` and the local radial direction at a point.
///
/// Survey records store the vertical component along the radial unit
/// vector, so `90 − angle_to(..)` recovers their inclination.
pub fn angle_to(field: Vec3, lon_deg: f64, lat_deg: f64, alt_m: f64) -> f64 {
    let radial = geographic_to_cartesian(lon_deg, lat_deg, alt_m);
    let cos_phi = dot(field, radial) / (norm(field) * norm(radial));
    cos_phi.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Inclination [deg] as displayed to users: `90 − angle_to`.
pub fn inclination_deg(field: Vec3, lon_deg: f64, lat_deg: f64, alt_m: f64) -> f64 {
    90.0 - angle_to(field, lon_deg, lat_deg, alt_m)
}
