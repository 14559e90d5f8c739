//! Box-constrained minimization for controller tuning.
//!
//! This crate provides a projected quasi-Newton (BFGS) minimizer driven by
//! finite-difference gradients. It knows nothing about controllers: the
//! objective is any fallible function of a parameter vector, and the feasible
//! set is a box `lower <= x <= upper`.

pub mod error;
pub mod gradient;
pub mod minimize;

pub use error::{TuneError, TuneResult};
pub use gradient::{bounded_forward_gradient, project, projected_gradient};
pub use minimize::{MinimizeResult, MinimizerConfig, Termination, minimize_bounded};
