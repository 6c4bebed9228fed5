use thiserror::Error;

use crate::workout::Metric;

/// Why the browser could not hand us a position.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("timed out")]
    Timeout,

    #[error("geolocation not supported")]
    Unsupported,
}

/// Failure reported by a key-value storage backend.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct StorageError(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkoutError {
    #[error("invalid {metric}: {value}")]
    InvalidMetric { metric: Metric, value: f64 },

    #[error("could not save workouts: {0}")]
    Persistence(StorageError),

    #[error("stored workouts are corrupt: {0}")]
    CorruptData(String),

    #[error("location unavailable: {0}")]
    LocationUnavailable(LocationError),

    #[error("no position selected on the map")]
    NoPendingLocation,
}

impl WorkoutError {
    /// Text shown to the user in the notification.
    pub fn user_message(&self) -> String {
        match self {
            WorkoutError::InvalidMetric { metric, .. } => {
                format!("The provided input is incorrect: check the {metric}")
            }
            WorkoutError::Persistence(_) => {
                "Workouts could not be saved in this browser".to_string()
            }
            WorkoutError::CorruptData(_) => {
                "Saved workouts could not be read and were discarded".to_string()
            }
            WorkoutError::LocationUnavailable(_) => "Couldn't retrieve your location".to_string(),
            WorkoutError::NoPendingLocation => "Click on the map to place your workout first".to_string(),
        }
    }
}

#[derive(Error, Debug)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] pub serde_json::Error);
