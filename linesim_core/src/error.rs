use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("sensor array needs at least one sensor")]
    NoSensors,
    #[error("expected {expected} sensor {what}, got {got}")]
    SensorCount {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
