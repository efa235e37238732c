//! Survey ingestion, current-loop field simulation and loop calibration.
//!
//! Ingestion: survey, dedup, ingest
//! Simulation: bfield, measured
//! Calibration: calibration, legacy

pub mod bfield;
pub mod calibration;
pub mod dedup;
pub mod ingest;
pub mod legacy;
pub mod measured;
pub mod survey;
