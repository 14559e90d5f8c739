use thiserror::Error;

pub type HtResult<T> = Result<T, HtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    #[error("Out of range: {what} = {value} not in [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
