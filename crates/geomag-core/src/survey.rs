// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Survey Line Validator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-width survey record parsing and physical consistency checks.
//!
//! A line carries 18 positional fields (station, date, colatitude,
//! east longitude, declination, inclination, H/X/Y/Z/F intensities in nT,
//! altitude, data code, source, serial, element code, GMT, country).
//! The measured components are rebuilt into a Cartesian field vector from
//! the local vertical/east/north frame, and the line is kept only when
//! the redundant H, F and inclination values agree with that vector to
//! within a few instrument resolution units.

use geomag_math::coords::LocalFrame;
use geomag_math::vec3::norm;
use geomag_types::constants::{
    ANGLE_RESOLUTION_RAD, COLUMN_BOUNDS, FIELD_COUNT, FIELD_RESOLUTION_T, MAX_LINE_LEN,
    MAX_RESIDUAL_UNITS, MIN_ALTITUDE_M, MIN_LINE_LEN,
};
use geomag_types::state::Record;
use tracing::trace;

const NANO_TESLA: f64 = 1e-9;

// Positions within the 18 raw fields.
const DATE: usize = 1;
const COLATITUDE: usize = 2;
const EAST_LONGITUDE: usize = 3;
const INCLINATION: usize = 5;
const HORIZONTAL: usize = 6;
const NORTH: usize = 7;
const EAST: usize = 8;
const VERTICAL: usize = 9;
const TOTAL: usize = 10;
const ALTITUDE: usize = 11;

/// Why a survey line was not turned into a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Character count outside `[MIN_LINE_LEN, MAX_LINE_LEN)`.
    LineLength(usize),
    /// Numeric field could not be parsed.
    Parse { field: usize },
    /// Survey date before the requested year.
    TooOld(f64),
    /// |H − √(X² + Y²)| exceeds tolerance (T).
    HorizontalResidual(f64),
    /// |F − |B|| exceeds tolerance (T).
    TotalResidual(f64),
    /// |I − atan2(Z, H)| exceeds tolerance (rad).
    InclinationResidual(f64),
    /// Altitude below MIN_ALTITUDE_M (m).
    BelowMinAltitude(f64),
}

/// Slice a line into its 18 positional fields by character offset.
///
/// Columns past the end of a short line come back truncated or empty.
pub fn split_columns(line: &str) -> Vec<String> {
    let offsets: Vec<usize> = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .collect();
    let n_chars = offsets.len() - 1;
    let byte_at = |col: usize| offsets[col.min(n_chars)];

    COLUMN_BOUNDS
        .windows(2)
        .map(|w| line[byte_at(w[0])..byte_at(w[1])].to_string())
        .collect()
}

fn numeric(fields: &[String], index: usize) -> Result<f64, Rejection> {
    fields[index]
        .trim()
        .parse::<f64>()
        .map_err(|_| Rejection::Parse { field: index })
}

fn within(residual: f64, resolution: f64) -> bool {
    // NaN fails the comparison.
    residual <= MAX_RESIDUAL_UNITS * resolution
}

/// Validate one survey line, reporting the first failed rule.
pub fn validate_line(line: &str, min_year: f64) -> Result<Record, Rejection> {
    let n_chars = line.chars().count();
    if !(MIN_LINE_LEN..MAX_LINE_LEN).contains(&n_chars) {
        return Err(Rejection::LineLength(n_chars));
    }

    let fields = split_columns(line);
    debug_assert_eq!(fields.len(), FIELD_COUNT);

    let date = numeric(&fields, DATE)?;
    if date.is_nan() || date < min_year {
        return Err(Rejection::TooOld(date));
    }

    let lat = (90.0 - numeric(&fields, COLATITUDE)?).to_radians();
    let lon = numeric(&fields, EAST_LONGITUDE)?.to_radians();
    let inclination = numeric(&fields, INCLINATION)?.to_radians();
    let horizontal = numeric(&fields, HORIZONTAL)? * NANO_TESLA;
    let north = numeric(&fields, NORTH)? * NANO_TESLA;
    let east = numeric(&fields, EAST)? * NANO_TESLA;
    let vertical = numeric(&fields, VERTICAL)? * NANO_TESLA;
    let total = numeric(&fields, TOTAL)? * NANO_TESLA;
    let altitude = numeric(&fields, ALTITUDE)?;

    let frame = LocalFrame::at(lat, lon);
    let field = frame.compose(vertical, east, north);

    let h_residual = (horizontal - north.hypot(east)).abs();
    if !within(h_residual, FIELD_RESOLUTION_T) {
        return Err(Rejection::HorizontalResidual(h_residual));
    }
    let f_residual = (total - norm(field)).abs();
    if !within(f_residual, FIELD_RESOLUTION_T) {
        return Err(Rejection::TotalResidual(f_residual));
    }
    let i_residual = (inclination - vertical.atan2(horizontal)).abs();
    if !within(i_residual, ANGLE_RESOLUTION_RAD) {
        return Err(Rejection::InclinationResidual(i_residual));
    }
    if altitude.is_nan() || altitude < MIN_ALTITUDE_M {
        return Err(Rejection::BelowMinAltitude(altitude));
    }

    Ok(Record::new(altitude, lat, lon, field, fields))
}

/// Parse a survey line into a record, or `None` when the line is malformed,
/// inconsistent, or dated before `min_year`.
pub fn parse_survey_line(line: &str, min_year: f64) -> Option<Record> {
    match validate_line(line, min_year) {
        Ok(record) => Some(record),
        Err(reason) => {
            trace!(?reason, "survey line rejected");
            None
        }
    }
}
