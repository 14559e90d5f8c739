//! Error types for the ht-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid trajectory: {0}")]
    InvalidTrajectory(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Search error: {0}")]
    Search(String),
}

/// Result type for ht-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ht_sim::SimError> for AppError {
    fn from(err: ht_sim::SimError) -> Self {
        match err {
            ht_sim::SimError::InvalidParameter { .. }
            | ht_sim::SimError::Control(ht_controls::ControlError::InvalidParameter { .. }) => {
                AppError::InvalidParameter(err.to_string())
            }
            _ => AppError::Simulation(err.to_string()),
        }
    }
}

impl From<ht_controls::ControlError> for AppError {
    fn from(err: ht_controls::ControlError) -> Self {
        AppError::InvalidParameter(err.to_string())
    }
}

impl From<ht_tune::TuneError> for AppError {
    fn from(err: ht_tune::TuneError) -> Self {
        AppError::Search(err.to_string())
    }
}
