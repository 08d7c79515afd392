use thiserror::Error;

#[derive(Debug, Error)]
pub enum AquadoseError {
    #[error("Tank volume must be a positive number of liters, got {0}")]
    InvalidVolume(f64),

    #[error("Invalid target range: min {min} / max {max} (expected 0 <= min <= max)")]
    InvalidRange { min: f64, max: f64 },

    #[error("pH must lie within [0, 14], got {0}")]
    InvalidPh(f64),

    #[error("Parameter '{parameter}' must not be negative, got {value}")]
    NegativeParameter { parameter: String, value: f64 },

    #[error("Parameter '{parameter}' must be a finite number, got {value}")]
    NonFiniteValue { parameter: String, value: f64 },

    #[error("{parameter} must lie within [0, 1], got {value}")]
    InvalidFraction { parameter: String, value: f64 },

    #[error("Water change day {day} is outside the projection horizon of {horizon_days} days")]
    InvalidWaterChangeDay { day: u32, horizon_days: u32 },

    #[error("Scaling factor '{parameter}' must be positive, got {value}")]
    InvalidFactor { parameter: String, value: f64 },

    #[error("Additive rate for {mode} mode must be positive, got {rate}")]
    InvalidRate { mode: String, rate: f64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}
