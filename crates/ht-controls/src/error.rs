//! Error types for control operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid parameter provided to a control function.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    /// A computed term was not finite.
    #[error("Non-finite controller value: {what}")]
    NonFinite { what: &'static str },
}

impl From<ht_core::HtError> for ControlError {
    fn from(e: ht_core::HtError) -> Self {
        match e {
            ht_core::HtError::NonFinite { what, .. } => ControlError::NonFinite { what },
            ht_core::HtError::InvalidParameter { what } => ControlError::InvalidParameter { what },
            ht_core::HtError::OutOfRange { what, .. } => ControlError::InvalidParameter { what },
        }
    }
}
