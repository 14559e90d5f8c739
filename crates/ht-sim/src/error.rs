//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during a closed-loop run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Run too long: {samples} samples exceeds limit of {limit}")]
    TooManySamples { samples: f64, limit: usize },

    #[error("Controller error: {0}")]
    Control(#[from] ht_controls::ControlError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ht_core::HtError> for SimError {
    fn from(e: ht_core::HtError) -> Self {
        match e {
            ht_core::HtError::NonFinite { what, .. } => SimError::InvalidParameter { what },
            ht_core::HtError::InvalidParameter { what } => SimError::InvalidParameter { what },
            ht_core::HtError::OutOfRange { what, .. } => SimError::NonPhysical { what },
        }
    }
}
