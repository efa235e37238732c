// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Oscillating Radius Search
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multiplicative step search kept for comparison with bracket refinement.
//!
//! The radius is multiplied or divided by a step factor each round. The
//! direction flips whenever the error grows, and the factor is halved when
//! the radius returns to the value it had two rounds earlier. The search
//! has no convergence guarantee and can settle into a 2-cycle.

use std::collections::VecDeque;

use geomag_types::error::{GeomagError, GeomagResult};
use geomag_types::state::CalibrationResult;
use tracing::debug;

use crate::calibration::Calibrator;

const HISTORY_LEN: usize = 4;
const START_STEP: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct OscillatingSearch {
    radius: f64,
    step_factor: f64,
    increasing: bool,
    last_error: f64,
    /// Most recent radii, oldest first. Seeded with values the search never visits.
    history: VecDeque<f64>,
}

impl OscillatingSearch {
    pub fn new(start_radius: f64) -> Self {
        OscillatingSearch {
            radius: start_radius,
            step_factor: START_STEP,
            increasing: true,
            last_error: 0.0,
            history: VecDeque::from(vec![0.1, 0.1, 0.0, 0.0]),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn step_factor(&self) -> f64 {
        self.step_factor
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    /// Take one step, score the new radius, and update direction and step.
    pub fn advance<F>(&mut self, mut score: F) -> GeomagResult<f64>
    where
        F: FnMut(f64) -> GeomagResult<f64>,
    {
        if self.increasing {
            self.radius *= self.step_factor;
        } else {
            self.radius /= self.step_factor;
        }
        let err = score(self.radius)?;

        self.history.push_back(self.radius);
        if self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }

        if err > self.last_error {
            self.increasing = !self.increasing;
        }
        // Back where we were two rounds ago: oscillating, so tighten.
        if self.history[1] == self.radius {
            self.step_factor /= 2.0;
        }
        self.last_error = err;
        Ok(err)
    }
}

/// Run `rounds` steps from `start_radius` and report the final radius.
pub fn oscillating_search<F>(
    start_radius: f64,
    rounds: usize,
    mut score: F,
) -> GeomagResult<CalibrationResult>
where
    F: FnMut(f64) -> GeomagResult<f64>,
{
    if rounds == 0 {
        return Err(GeomagError::InvalidSampling(
            "oscillating search needs at least one round".to_string(),
        ));
    }

    let mut search = OscillatingSearch::new(start_radius);
    for round in 0..rounds {
        let err = search.advance(&mut score)?;
        debug!(
            round,
            radius = search.radius(),
            step = search.step_factor(),
            error = err,
            "oscillating search step"
        );
    }

    Ok(CalibrationResult {
        best: search.radius(),
        error: search.last_error(),
        rounds,
    })
}

impl Calibrator {
    /// Oscillating radius search on the angle error, starting from 1 m.
    pub fn angle_optimization(&self, rounds: usize) -> GeomagResult<CalibrationResult> {
        oscillating_search(1.0, rounds, |radius| self.angle_error(radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::synthetic::loop_dataset;
    use geomag_types::constants::DEFAULT_LOOP_CURRENT_A;

    fn log_distance_to_eight(x: f64) -> GeomagResult<f64> {
        Ok((x.ln() - 8f64.ln()).abs())
    }

    #[test]
    fn test_first_steps_follow_error_trend() {
        let mut search = OscillatingSearch::new(1.0);

        search.advance(log_distance_to_eight).unwrap();
        assert_eq!(search.radius(), 2.0);
        assert!(!search.increasing, "error rose from 0, direction flips");

        search.advance(log_distance_to_eight).unwrap();
        assert_eq!(search.radius(), 1.0);
        assert!(search.increasing);
        assert_eq!(search.step_factor(), 2.0);
    }

    #[test]
    fn test_step_halves_on_return_to_earlier_radius() {
        let mut search = OscillatingSearch::new(1.0);
        for _ in 0..3 {
            search.advance(log_distance_to_eight).unwrap();
        }
        // 2 → 1 → 2: back to the radius of two rounds ago.
        assert_eq!(search.radius(), 2.0);
        assert_eq!(search.step_factor(), 1.0);

        search.advance(log_distance_to_eight).unwrap();
        search.advance(log_distance_to_eight).unwrap();
        assert_eq!(search.radius(), 2.0);
        assert_eq!(search.step_factor(), 0.5);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut search = OscillatingSearch::new(1.0);
        for _ in 0..10 {
            search.advance(log_distance_to_eight).unwrap();
        }
        assert_eq!(search.history.len(), HISTORY_LEN);
        assert_eq!(search.history.back().copied(), Some(search.radius()));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = oscillating_search(1.0, 0, log_distance_to_eight).unwrap_err();
        assert!(matches!(err, GeomagError::InvalidSampling(_)));
    }

    #[test]
    fn test_score_error_propagates() {
        let err = oscillating_search(1.0, 3, |_| Err(GeomagError::EmptySeries)).unwrap_err();
        assert!(matches!(err, GeomagError::EmptySeries));
    }

    #[test]
    fn test_angle_optimization_on_dataset() {
        let ds = loop_dataset(DEFAULT_LOOP_CURRENT_A, 3e6);
        let cal = Calibrator::new(&ds).unwrap();
        let result = cal.angle_optimization(12).unwrap();
        assert_eq!(result.rounds, 12);
        assert!(result.best.is_finite() && result.best > 0.0);
        assert!(result.error.is_finite());
    }
}
