// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Calibration Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-dimensional bracket refinement of loop parameters against a dataset.
//!
//! Each round samples `n` evenly spaced candidates in `[lower, upper)`,
//! scores them, and narrows the interval around the best one:
//!
//! - best is the last candidate  → `(c[n-2], c[n-1])`
//! - best is the first candidate → `(c[0], c[1])`
//! - otherwise                   → `(c[i-1], c[i+1])`
//!
//! The upper bound itself is never sampled. No convergence test is applied;
//! the loop always runs the requested number of rounds.

use geomag_math::metrics::{relative_rms, vector_relative_rms};
use geomag_math::vec3::norm;
use geomag_types::config::CalibrationConfig;
use geomag_types::constants::{DEFAULT_LOOP_CURRENT_A, DEFAULT_LOOP_RADIUS_M};
use geomag_types::error::{GeomagError, GeomagResult};
use geomag_types::state::{CalibrationBracket, CalibrationOutcome, CalibrationResult, Dataset};
use ndarray::{Array1, Array2};
use tracing::{debug, info};

use crate::bfield::{angle_to, CurrentLoop};
use crate::measured::MeasuredSeries;

/// Which loop parameter is fitted, and against which observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationTarget {
    /// Radius, scored on radial angles at the default current.
    Angle,
    /// Current, scored on field magnitudes at the default radius.
    Magnitude,
    /// Radius, scored on full field vectors at the default current.
    Vector,
}

/// `n` evenly spaced points `lower + k·(upper − lower)/n`, k = 0..n.
pub fn sample_candidates(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    let step = (upper - lower) / n as f64;
    (0..n).map(|k| lower + k as f64 * step).collect()
}

/// Index of the first minimal finite score, if any score is finite.
fn first_min(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (k, &s) in scores.iter().enumerate() {
        if !s.is_finite() {
            continue;
        }
        match best {
            Some(b) if s >= scores[b] => {}
            _ => best = Some(k),
        }
    }
    best
}

/// Narrowed interval around candidate `best`. Needs at least two candidates.
pub fn select_bracket(candidates: &[f64], best: usize) -> (f64, f64) {
    let last = candidates.len() - 1;
    if best == last {
        (candidates[last - 1], candidates[last])
    } else if best == 0 {
        (candidates[0], candidates[1])
    } else {
        (candidates[best - 1], candidates[best + 1])
    }
}

/// One refinement round: score every candidate and pick the next bracket.
///
/// Ties resolve to the lowest index. Non-finite scores never win; if no
/// score is finite the round fails with [`GeomagError::InvalidSampling`].
pub fn refine<F>(
    lower: f64,
    upper: f64,
    sample_count: usize,
    mut score: F,
) -> GeomagResult<CalibrationOutcome>
where
    F: FnMut(f64) -> GeomagResult<f64>,
{
    if sample_count < 2 {
        return Err(GeomagError::InvalidSampling(format!(
            "sample_count must be >= 2, got {sample_count}"
        )));
    }

    let candidates = sample_candidates(lower, upper, sample_count);
    let scores = candidates
        .iter()
        .map(|&c| score(c))
        .collect::<GeomagResult<Vec<f64>>>()?;

    let best = first_min(&scores).ok_or_else(|| {
        GeomagError::InvalidSampling(format!(
            "no finite error among {sample_count} candidates in [{lower}, {upper})"
        ))
    })?;

    Ok(CalibrationOutcome {
        best: candidates[best],
        error: scores[best],
        bracket: select_bracket(&candidates, best),
    })
}

/// Repeated [`refine`] over a shrinking bracket.
///
/// Returns the best candidate of the final round.
pub fn bracket_search<F>(config: &CalibrationConfig, mut score: F) -> GeomagResult<CalibrationResult>
where
    F: FnMut(f64) -> GeomagResult<f64>,
{
    config.validate()?;

    let mut bracket = CalibrationBracket::new(config.lower, config.upper);
    let mut best = config.lower;
    for round in 0..config.iterations {
        let outcome = refine(bracket.lower, bracket.upper, config.sample_count, &mut score)?;
        best = outcome.best;
        bracket = CalibrationBracket {
            lower: outcome.bracket.0,
            upper: outcome.bracket.1,
            error: outcome.error,
        };
        debug!(
            round,
            best,
            error = bracket.error,
            lower = bracket.lower,
            upper = bracket.upper,
            "bracket refinement round"
        );
    }

    Ok(CalibrationResult {
        best,
        error: bracket.error,
        rounds: config.iterations,
    })
}

/// Scores loop parameters against one dataset.
#[derive(Debug, Clone)]
pub struct Calibrator {
    series: MeasuredSeries,
    measured_angles: Array1<f64>,
}

impl Calibrator {
    pub fn new(dataset: &Dataset) -> GeomagResult<Self> {
        Self::from_series(MeasuredSeries::from_records(dataset.records()))
    }

    pub fn from_series(series: MeasuredSeries) -> GeomagResult<Self> {
        if series.is_empty() {
            return Err(GeomagError::EmptySeries);
        }
        let measured_angles = series.radial_angles();
        Ok(Calibrator {
            series,
            measured_angles,
        })
    }

    pub fn series(&self) -> &MeasuredSeries {
        &self.series
    }

    pub fn measured_angles(&self) -> &Array1<f64> {
        &self.measured_angles
    }

    /// Simulated radial angles [deg] for a loop at every dataset point.
    pub fn simulated_angles(&self, current: f64, radius: f64) -> Array1<f64> {
        let lp = CurrentLoop::new(current, radius);
        (0..self.series.len())
            .map(|k| {
                let (lon, lat, alt) = self.series.point(k);
                angle_to(lp.field_at(lon, lat, alt), lon, lat, alt)
            })
            .collect()
    }

    /// Simulated |B| [T] for a loop at every dataset point.
    pub fn simulated_magnitudes(&self, current: f64, radius: f64) -> Array1<f64> {
        let lp = CurrentLoop::new(current, radius);
        (0..self.series.len())
            .map(|k| {
                let (lon, lat, alt) = self.series.point(k);
                norm(lp.field_at(lon, lat, alt))
            })
            .collect()
    }

    /// Simulated B [T], shape `[n, 3]`.
    pub fn simulated_fields(&self, current: f64, radius: f64) -> Array2<f64> {
        let lp = CurrentLoop::new(current, radius);
        let n = self.series.len();
        let mut out: Array2<f64> = Array2::zeros((n, 3));
        for k in 0..n {
            let (lon, lat, alt) = self.series.point(k);
            let b = lp.field_at(lon, lat, alt);
            for c in 0..3 {
                out[[k, c]] = b[c];
            }
        }
        out
    }

    /// Angle error of a loop with `radius` at the default current.
    pub fn angle_error(&self, radius: f64) -> GeomagResult<f64> {
        let sim = self.simulated_angles(DEFAULT_LOOP_CURRENT_A, radius);
        relative_rms(self.measured_angles.view(), sim.view())
    }

    /// Magnitude error of a loop with `current` at the default radius.
    pub fn magnitude_error(&self, current: f64) -> GeomagResult<f64> {
        let sim = self.simulated_magnitudes(current, DEFAULT_LOOP_RADIUS_M);
        relative_rms(self.series.magnitude.view(), sim.view())
    }

    /// Component-wise vector error of a loop with `radius` at the default current.
    pub fn vector_error(&self, radius: f64) -> GeomagResult<f64> {
        let sim = self.simulated_fields(DEFAULT_LOOP_CURRENT_A, radius);
        vector_relative_rms(self.series.field.view(), sim.view())
    }

    pub fn error(&self, target: CalibrationTarget, value: f64) -> GeomagResult<f64> {
        match target {
            CalibrationTarget::Angle => self.angle_error(value),
            CalibrationTarget::Magnitude => self.magnitude_error(value),
            CalibrationTarget::Vector => self.vector_error(value),
        }
    }

    /// Fit one parameter with the bracket search described by `config`.
    pub fn optimize(
        &self,
        target: CalibrationTarget,
        config: &CalibrationConfig,
    ) -> GeomagResult<CalibrationResult> {
        let result = bracket_search(config, |value| self.error(target, value))?;
        info!(
            ?target,
            best = result.best,
            error = result.error,
            rounds = result.rounds,
            points = self.series.len(),
            "calibration finished"
        );
        Ok(result)
    }

    /// Best loop radius [m] by radial-angle error.
    pub fn optimize_angle(
        &self,
        lower: f64,
        upper: f64,
        sample_count: usize,
        iterations: usize,
    ) -> GeomagResult<CalibrationResult> {
        self.optimize(
            CalibrationTarget::Angle,
            &search_config(lower, upper, sample_count, iterations),
        )
    }

    /// Best loop current [A] by magnitude error.
    pub fn optimize_magnitude(
        &self,
        lower: f64,
        upper: f64,
        sample_count: usize,
        iterations: usize,
    ) -> GeomagResult<CalibrationResult> {
        self.optimize(
            CalibrationTarget::Magnitude,
            &search_config(lower, upper, sample_count, iterations),
        )
    }

    /// Best loop radius [m] by full-vector error.
    pub fn optimize_vector(
        &self,
        lower: f64,
        upper: f64,
        sample_count: usize,
        iterations: usize,
    ) -> GeomagResult<CalibrationResult> {
        self.optimize(
            CalibrationTarget::Vector,
            &search_config(lower, upper, sample_count, iterations),
        )
    }
}

fn search_config(lower: f64, upper: f64, sample_count: usize, iterations: usize) -> CalibrationConfig {
    CalibrationConfig {
        lower,
        upper,
        sample_count,
        iterations,
    }
}

#[cfg(test)]
pub(crate) mod synthetic {
    use geomag_types::state::{Dataset, Record};

    use crate::bfield::CurrentLoop;

    /// Off-equator survey points `(lon_deg, lat_deg, alt_m)`.
    pub const POINTS: [(f64, f64, f64); 6] = [
        (6.15, 43.7, 50.0),
        (356.2, 43.4, 1200.0),
        (100.0, -20.0, 0.0),
        (250.0, 61.5, 300.0),
        (180.0, -35.0, 15.0),
        (30.0, 75.0, 0.0),
    ];

    /// Dataset whose fields are exactly those of the given loop.
    pub fn loop_dataset(current: f64, radius: f64) -> Dataset {
        let lp = CurrentLoop::new(current, radius);
        POINTS
            .iter()
            .map(|&(lon, lat, alt)| {
                Record::new(
                    alt,
                    lat.to_radians(),
                    lon.to_radians(),
                    lp.field_at(lon, lat, alt),
                    vec![String::new(); 18],
                )
            })
            .collect::<Vec<_>>()
            .into()
    }
}
