//! Mathematical primitives for the geomagnetic loop model.

pub mod coords;
pub mod metrics;
pub mod vec3;
