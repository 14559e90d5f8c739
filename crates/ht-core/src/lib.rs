//! ht-core: shared foundation for hydrotune.
//!
//! Contains:
//! - numeric (Real + float validation and window statistics)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{HtError, HtResult};
pub use numeric::*;
