// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Spatial Deduplication
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Minimum-separation insertion into a dataset.
//!
//! Existing records are scanned in insertion order and the FIRST one closer
//! than `min_distance` decides the outcome. This is not a nearest-neighbour
//! rule: a later, closer record is never consulted.

use geomag_math::coords::record_position;
use geomag_math::vec3::distance;
use geomag_types::state::{Dataset, Record};

/// What happened to a candidate offered to [`try_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Appended,
    /// Replaced the record at this index.
    Replaced(usize),
    /// Too close to the record at this index.
    Dropped(usize),
}

/// Insert `candidate` unless an earlier record lies within `min_distance` metres.
///
/// A record closer than `min_distance / 100` is replaced when the candidate
/// has a strictly later survey date. `min_distance <= 0` disables the check.
pub fn try_insert(dataset: &mut Dataset, mut candidate: Record, min_distance: f64) -> InsertOutcome {
    if min_distance <= 0.0 {
        dataset.push(candidate);
        return InsertOutcome::Appended;
    }

    let position = record_position(&candidate);
    let hit = dataset
        .iter()
        .enumerate()
        .map(|(i, existing)| (i, distance(record_position(existing), position)))
        .find(|&(_, dist)| dist < min_distance);

    let Some((index, dist)) = hit else {
        dataset.push(candidate);
        return InsertOutcome::Appended;
    };

    let newer = match (candidate.date(), dataset.records()[index].date()) {
        (Some(new), Some(old)) => new > old,
        _ => false,
    };
    if dist < min_distance / 100.0 && newer {
        candidate.geomag_latitude = None;
        candidate.geomag_longitude = None;
        candidate.simulated.clear();
        dataset.replace(index, candidate);
        InsertOutcome::Replaced(index)
    } else {
        InsertOutcome::Dropped(index)
    }
}
