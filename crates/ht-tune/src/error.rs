//! Error types for minimizer operations.

use thiserror::Error;

/// Errors that can occur during a bounded minimization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuneError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Objective returned a non-finite value at {x:?}")]
    NonFinite { x: Vec<f64> },

    #[error("Objective evaluation failed: {message}")]
    Objective { message: String },
}

pub type TuneResult<T> = Result<T, TuneError>;
