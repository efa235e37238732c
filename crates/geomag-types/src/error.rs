use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeomagError {
    #[error("Relative error undefined: measured value at index {index} is zero")]
    ZeroMeasurement { index: usize },

    #[error("Sequence length mismatch: measured={measured}, simulated={simulated}")]
    LengthMismatch { measured: usize, simulated: usize },

    #[error("Cannot score an empty series")]
    EmptySeries,

    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GeomagResult<T> = Result<T, GeomagError>;
