// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::f64::consts::PI;

/// Mean Earth radius (m).
pub const EARTH_RADIUS_M: f64 = 6.3710e6;

/// Vacuum permeability (H/m), exact pre-2019 SI form 4π·10⁻⁷.
pub const MU0: f64 = 4.0 * PI * 1e-7;

/// Reference field (T): 21.295 µT horizontal at 63.30° inclination.
/// Not used by the loop model; kept for comparison output.
pub const REFERENCE_FIELD_T: f64 = 4.739_394_520_507_281e-5;

/// Number of straight segments approximating the current loop.
/// Calibration results are only comparable at this resolution.
pub const LOOP_SEGMENTS: usize = 100;

/// Loop current held fixed while the radius is searched (A).
pub const DEFAULT_LOOP_CURRENT_A: f64 = 1e9;

/// Loop radius held fixed while the current is searched (m).
pub const DEFAULT_LOOP_RADIUS_M: f64 = 5e6;

/// Consistency tolerance, in multiples of the instrument resolution.
pub const MAX_RESIDUAL_UNITS: f64 = 5.0;

/// Intensity resolution of the survey records (T).
pub const FIELD_RESOLUTION_T: f64 = 1e-9;

/// Angular resolution of the survey records (rad).
pub const ANGLE_RESOLUTION_RAD: f64 = 1e-3;

/// Records below this altitude are rejected (m).
pub const MIN_ALTITUDE_M: f64 = -500.0;

/// Accepted line lengths, half-open `[MIN, MAX)`.
pub const MIN_LINE_LEN: usize = 129;
pub const MAX_LINE_LEN: usize = 134;

/// Character offsets separating the 18 positional fields of a survey line.
pub const COLUMN_BOUNDS: [usize; 19] = [
    0, 15, 24, 33, 41, 51, 59, 66, 74, 82, 90, 97, 102, 104, 108, 116, 123, 127, 132,
];

/// Number of positional fields in a survey line.
pub const FIELD_COUNT: usize = COLUMN_BOUNDS.len() - 1;
