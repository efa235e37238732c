// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Error Metrics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Aggregate relative-error scores between measured and simulated series.
//!
//! Both metrics normalise each residual by the measured value, so a zero
//! measurement makes the score undefined. That case is reported as
//! [`GeomagError::ZeroMeasurement`] rather than producing `inf`/`NaN`.

use geomag_types::error::{GeomagError, GeomagResult};
use ndarray::{ArrayView1, ArrayView2, Axis};

/// Relative RMS error of scalar series:
///
///   sqrt( (1/N) · Σ ((m_k − s_k) / m_k)² )
pub fn relative_rms(measured: ArrayView1<f64>, simulated: ArrayView1<f64>) -> GeomagResult<f64> {
    check_lengths(measured.len(), simulated.len())?;

    let mut sum = 0.0;
    for (k, (&m, &s)) in measured.iter().zip(simulated.iter()).enumerate() {
        if m == 0.0 {
            return Err(GeomagError::ZeroMeasurement { index: k });
        }
        let rel = (m - s) / m;
        sum += rel * rel;
    }

    Ok((sum / measured.len() as f64).sqrt())
}

/// Relative RMS error of vector series given as `[N, 3]` matrices:
///
///   sqrt( (1/N) · Σ |m_k − s_k|² / |m_k|² )
pub fn vector_relative_rms(
    measured: ArrayView2<f64>,
    simulated: ArrayView2<f64>,
) -> GeomagResult<f64> {
    check_lengths(measured.nrows(), simulated.nrows())?;
    if measured.ncols() != simulated.ncols() {
        return Err(GeomagError::LengthMismatch {
            measured: measured.ncols(),
            simulated: simulated.ncols(),
        });
    }

    let mut sum = 0.0;
    for (k, (m, s)) in measured
        .axis_iter(Axis(0))
        .zip(simulated.axis_iter(Axis(0)))
        .enumerate()
    {
        let m_sq = m.dot(&m);
        if m_sq == 0.0 {
            return Err(GeomagError::ZeroMeasurement { index: k });
        }
        let diff = &m - &s;
        sum += diff.dot(&diff) / m_sq;
    }

    Ok((sum / measured.nrows() as f64).sqrt())
}

fn check_lengths(measured: usize, simulated: usize) -> GeomagResult<()> {
    if measured != simulated {
        return Err(GeomagError::LengthMismatch {
            measured,
            simulated,
        });
    }
    if measured == 0 {
        return Err(GeomagError::EmptySeries);
    }
    Ok(())
}
