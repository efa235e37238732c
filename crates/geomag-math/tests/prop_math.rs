// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Property-Based Tests (proptest) for geomag-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for geomag-math using proptest.
//!
//! Covers: spherical/Cartesian roundtrip, local frame orthonormality,
//! relative error metrics.

use geomag_math::coords::{cartesian_to_spherical, spherical_to_cartesian, LocalFrame};
use geomag_math::metrics::{relative_rms, vector_relative_rms};
use geomag_math::vec3::{cross, distance, dot, norm};
use geomag_types::error::GeomagError;
use ndarray::{Array1, Array2};
use proptest::prelude::*;

// ── Coordinate Properties ────────────────────────────────────────────

proptest! {
    /// spherical → Cartesian → spherical recovers r and latitude, and
    /// longitude modulo 2π.
    #[test]
    fn spherical_roundtrip(
        r in 1.0f64..1e8,
        lat in -1.5f64..1.5,
        lon in -3.1f64..3.1,
    ) {
        let (r2, lat2, lon2) = cartesian_to_spherical(spherical_to_cartesian(r, lat, lon));
        prop_assert!((r2 - r).abs() <= 1e-9 * r, "r {} vs {}", r2, r);
        prop_assert!((lat2 - lat).abs() < 1e-9, "lat {} vs {}", lat2, lat);
        prop_assert!((lon2 - lon).abs() < 1e-9, "lon {} vs {}", lon2, lon);
    }

    /// The local frame is orthonormal and right-handed.
    #[test]
    fn local_frame_orthonormal(lat in -1.5f64..1.5, lon in 0.0f64..6.28) {
        let f = LocalFrame::at(lat, lon);
        for v in [f.vertical, f.east, f.north] {
            prop_assert!((norm(v) - 1.0).abs() < 1e-12);
        }
        prop_assert!(dot(f.vertical, f.east).abs() < 1e-12);
        prop_assert!(dot(f.vertical, f.north).abs() < 1e-12);
        prop_assert!(dot(f.east, f.north).abs() < 1e-12);
        prop_assert!(distance(cross(f.east, f.north), f.vertical) < 1e-12);
    }

    /// North always has a non-negative z component away from the poles.
    #[test]
    fn local_north_points_poleward(lat in -1.5f64..1.5, lon in 0.0f64..6.28) {
        let f = LocalFrame::at(lat, lon);
        prop_assert!(f.north[2] > 0.0);
    }
}

// ── Metric Properties ────────────────────────────────────────────────

proptest! {
    /// Identical non-zero series score zero.
    #[test]
    fn relative_rms_zero_on_identical(values in prop::collection::vec(0.1f64..100.0, 1..50)) {
        let m = Array1::from(values);
        prop_assert_eq!(relative_rms(m.view(), m.view()).unwrap(), 0.0);
    }

    /// A uniform scale factor s gives error |1 − s| at every point.
    #[test]
    fn relative_rms_uniform_scale(
        values in prop::collection::vec(0.1f64..100.0, 1..50),
        s in 0.0f64..3.0,
    ) {
        let m = Array1::from(values);
        let sim = &m * s;
        let err = relative_rms(m.view(), sim.view()).unwrap();
        prop_assert!((err - (1.0 - s).abs()).abs() < 1e-12, "err {} for s {}", err, s);
    }

    /// Mismatched lengths are always reported, never truncated.
    #[test]
    fn relative_rms_length_mismatch(n in 1usize..30, extra in 1usize..5) {
        let m = Array1::from_elem(n, 1.0);
        let s = Array1::from_elem(n + extra, 1.0);
        let is_mismatch = matches!(
            relative_rms(m.view(), s.view()),
            Err(GeomagError::LengthMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    /// Vector error is non-negative and zero on identical rows.
    #[test]
    fn vector_rms_nonnegative(n in 1usize..20, s in -2.0f64..2.0) {
        let m = Array2::from_shape_fn((n, 3), |(i, j)| 1e-5 * (1.0 + i as f64 + 0.5 * j as f64));
        let sim = &m * s;
        let err = vector_relative_rms(m.view(), sim.view()).unwrap();
        prop_assert!(err >= 0.0);
        prop_assert!((err - (1.0 - s).abs()).abs() < 1e-12);
        prop_assert_eq!(vector_relative_rms(m.view(), m.view()).unwrap(), 0.0);
    }
}
