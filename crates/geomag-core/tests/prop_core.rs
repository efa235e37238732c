// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Property-Based Tests (proptest) for geomag-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for geomag-core using proptest.
//!
//! Covers: loop field scaling and symmetry, radial angle range, bracket
//! refinement invariants, deduplication outcomes, line length screening.

use geomag_core::bfield::{angle_to, field_at};
use geomag_core::calibration::{refine, sample_candidates};
use geomag_core::dedup::{try_insert, InsertOutcome};
use geomag_core::survey::{validate_line, Rejection};
use geomag_math::vec3::{norm, scale, sub};
use geomag_types::state::{Dataset, Record};
use proptest::prelude::*;

fn record(lat_deg: f64, lon_deg: f64, date: f64) -> Record {
    let mut raw = vec![String::new(); 18];
    raw[1] = format!("{date:9.3}");
    Record::new(0.0, lat_deg.to_radians(), lon_deg.to_radians(), [1e-5, 0.0, 4e-5], raw)
}

// ── Loop Field Properties ────────────────────────────────────────────

proptest! {
    /// The field is linear in the loop current.
    #[test]
    fn field_linear_in_current(
        lon in 0.0f64..360.0,
        lat in -85.0f64..85.0,
        current in 1e6f64..1e10,
        k in 0.1f64..10.0,
    ) {
        let b1 = field_at(lon, lat, 0.0, current, 4e6);
        let bk = field_at(lon, lat, 0.0, k * current, 4e6);
        let diff = norm(sub(bk, scale(b1, k)));
        prop_assert!(diff <= 1e-10 * norm(bk), "diff {} vs |B| {}", diff, norm(bk));
    }

    /// Reflecting through the loop plane flips the in-plane components and
    /// keeps the axial one.
    #[test]
    fn field_mirror_symmetric_about_equator(
        lon in 0.0f64..360.0,
        lat in 1.0f64..85.0,
    ) {
        let north = field_at(lon, lat, 0.0, 1e9, 5e6);
        let south = field_at(lon, -lat, 0.0, 1e9, 5e6);
        let mirrored = [-south[0], -south[1], south[2]];
        prop_assert!(norm(sub(north, mirrored)) <= 1e-9 * norm(north));
    }

    /// Radial angles lie in [0, 180] for any non-zero field.
    #[test]
    fn angle_to_in_range(
        bx in -1e-4f64..1e-4,
        by in -1e-4f64..1e-4,
        bz in 1e-7f64..1e-4,
        lon in 0.0f64..360.0,
        lat in -90.0f64..90.0,
    ) {
        let a = angle_to([bx, by, bz], lon, lat, 0.0);
        prop_assert!((0.0..=180.0).contains(&a), "angle {}", a);
    }
}

// ── Bracket Refinement Properties ────────────────────────────────────

proptest! {
    /// The chosen candidate lies inside the next bracket, which lies inside
    /// the sampled range.
    #[test]
    fn refine_bracket_contains_best(
        lower in -1e3f64..1e3,
        width in 1.0f64..1e3,
        n in 2usize..40,
        target in -2e3f64..2e3,
    ) {
        let upper = lower + width;
        let out = refine(lower, upper, n, |x| Ok((x - target).abs())).unwrap();
        let (lo, hi) = out.bracket;
        prop_assert!(lo < hi);
        prop_assert!(lo <= out.best && out.best <= hi);
        prop_assert!(lower <= lo && hi < upper);
    }

    /// Candidates are ascending, start at the lower bound, and stop short
    /// of the upper bound.
    #[test]
    fn candidates_half_open(lower in -1e6f64..1e6, width in 1.0f64..1e6, n in 1usize..100) {
        let c = sample_candidates(lower, lower + width, n);
        prop_assert_eq!(c.len(), n);
        prop_assert_eq!(c[0], lower);
        prop_assert!(c.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(c[n - 1] < lower + width);
    }
}

// ── Deduplication Properties ─────────────────────────────────────────

proptest! {
    /// A non-positive separation disables deduplication entirely.
    #[test]
    fn nonpositive_distance_always_appends(
        points in prop::collection::vec((-80.0f64..80.0, 0.0f64..360.0), 1..20),
        min_distance in -1e5f64..=0.0,
    ) {
        let mut ds = Dataset::new();
        for &(lat, lon) in &points {
            prop_assert_eq!(try_insert(&mut ds, record(lat, lon, 2015.0), min_distance), InsertOutcome::Appended);
        }
        prop_assert_eq!(ds.len(), points.len());
    }

    /// Re-offering an accepted record with the same date never grows the dataset.
    #[test]
    fn duplicate_is_dropped(
        lat in -80.0f64..80.0,
        lon in 0.0f64..360.0,
        min_distance in 1.0f64..1e6,
    ) {
        let mut ds = Dataset::new();
        try_insert(&mut ds, record(lat, lon, 2015.0), min_distance);
        let outcome = try_insert(&mut ds, record(lat, lon, 2015.0), min_distance);
        prop_assert_eq!(outcome, InsertOutcome::Dropped(0));
        prop_assert_eq!(ds.len(), 1);
    }

    /// A strictly newer co-located record replaces the original in place.
    #[test]
    fn newer_duplicate_replaces(
        lat in -80.0f64..80.0,
        lon in 0.0f64..360.0,
        min_distance in 1.0f64..1e6,
        later in 0.001f64..20.0,
    ) {
        let mut ds = Dataset::new();
        try_insert(&mut ds, record(lat, lon, 2010.0), min_distance);
        let outcome = try_insert(&mut ds, record(lat, lon, 2010.0 + later), min_distance);
        prop_assert_eq!(outcome, InsertOutcome::Replaced(0));
        prop_assert_eq!(ds.len(), 1);
    }
}

// ── Line Screening ───────────────────────────────────────────────────

proptest! {
    /// Lines shorter than 129 or at least 134 characters are rejected on length.
    #[test]
    fn out_of_range_lengths_rejected(len in prop_oneof![0usize..129, 134usize..300]) {
        let line = "9".repeat(len);
        prop_assert_eq!(validate_line(&line, 2000.0).unwrap_err(), Rejection::LineLength(len));
    }
}
