//! Control law and actuation policy for hydrotune.
//!
//! The control side of the irrigation loop is split in two:
//! - a PID controller that turns a humidity error into a continuous output,
//! - a pump policy that reduces that output to an on/off decision.
//!
//! # Design Principles
//!
//! - **Explicit state**: controller memory lives in [`PidState`] and is only
//!   cleared by constructing a new controller or calling [`PidController::reset`]
//! - **Validated steps**: a non-positive time step is an error, never a silent
//!   infinity in the derivative term

pub mod actuator;
pub mod controller;
pub mod error;

pub use actuator::PumpPolicy;
pub use controller::{ControllerGains, INTEGRAL_LIMIT, PidController, PidOutput, PidState};
pub use error::{ControlError, ControlResult};
