// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOOP_CURRENT_A, DEFAULT_LOOP_RADIUS_M};
use crate::error::{GeomagError, GeomagResult};

/// Top-level run configuration. Every section may be omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeomagConfig {
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Radius search driven by inclination-angle error.
    #[serde(default = "CalibrationConfig::default_angle")]
    pub angle: CalibrationConfig,
    /// Current search driven by field-magnitude error.
    #[serde(default = "CalibrationConfig::default_magnitude")]
    pub magnitude: CalibrationConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Survey ingestion filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Lines dated before this fractional year are dropped.
    #[serde(default = "default_min_year")]
    pub min_year: f64,
    /// Minimum spacing between accepted stations (m). `<= 0` keeps every record.
    #[serde(default)]
    pub min_distance_m: f64,
}

fn default_min_year() -> f64 {
    2010.0
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            min_year: default_min_year(),
            min_distance_m: 0.0,
        }
    }
}

/// Bracket-refinement search settings for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub lower: f64,
    pub upper: f64,
    pub sample_count: usize,
    pub iterations: usize,
}

impl CalibrationConfig {
    /// Radius range of 1000 km to 6000 km, 10 samples, 5 rounds.
    pub fn default_angle() -> Self {
        CalibrationConfig {
            lower: 1e6,
            upper: 6e6,
            sample_count: 10,
            iterations: 5,
        }
    }

    /// Current range of 1e8 A to 1e10 A, 10 samples, 5 rounds.
    pub fn default_magnitude() -> Self {
        CalibrationConfig {
            lower: 1e8,
            upper: 1e10,
            sample_count: 10,
            iterations: 5,
        }
    }

    pub fn validate(&self) -> GeomagResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(GeomagError::InvalidSampling(format!(
                "bracket bounds must be finite, got ({}, {})",
                self.lower, self.upper
            )));
        }
        if self.lower >= self.upper {
            return Err(GeomagError::InvalidSampling(format!(
                "bracket lower bound {} must be below upper bound {}",
                self.lower, self.upper
            )));
        }
        if self.sample_count < 2 {
            return Err(GeomagError::InvalidSampling(format!(
                "sample_count must be >= 2, got {}",
                self.sample_count
            )));
        }
        if self.iterations == 0 {
            return Err(GeomagError::InvalidSampling(
                "iterations must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loop parameters used for single-point field evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_loop_current")]
    pub loop_current_a: f64,
    #[serde(default = "default_loop_radius")]
    pub loop_radius_m: f64,
}

fn default_loop_current() -> f64 {
    DEFAULT_LOOP_CURRENT_A
}
fn default_loop_radius() -> f64 {
    DEFAULT_LOOP_RADIUS_M
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            loop_current_a: default_loop_current(),
            loop_radius_m: default_loop_radius(),
        }
    }
}

impl Default for GeomagConfig {
    fn default() -> Self {
        GeomagConfig {
            ingest: IngestConfig::default(),
            angle: CalibrationConfig::default_angle(),
            magnitude: CalibrationConfig::default_magnitude(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl GeomagConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> GeomagResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GeomagResult<()> {
        if !self.ingest.min_year.is_finite() {
            return Err(GeomagError::ConfigError(format!(
                "ingest.min_year must be finite, got {}",
                self.ingest.min_year
            )));
        }
        if !self.ingest.min_distance_m.is_finite() {
            return Err(GeomagError::ConfigError(format!(
                "ingest.min_distance_m must be finite, got {}",
                self.ingest.min_distance_m
            )));
        }
        let sim = &self.simulation;
        if !sim.loop_current_a.is_finite() || !sim.loop_radius_m.is_finite() {
            return Err(GeomagError::ConfigError(
                "simulation loop current/radius must be finite".to_string(),
            ));
        }
        if sim.loop_radius_m <= 0.0 {
            return Err(GeomagError::ConfigError(format!(
                "simulation.loop_radius_m must be > 0, got {}",
                sim.loop_radius_m
            )));
        }
        self.angle.validate()?;
        self.magnitude.validate()?;
        Ok(())
    }
}
