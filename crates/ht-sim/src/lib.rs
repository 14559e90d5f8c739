//! Closed-loop irrigation simulation.
//!
//! Provides:
//! - Soil humidity plant driven by an on/off pump
//! - Fixed-step closed-loop runner (plant + PID + pump policy)
//! - Trajectory record consumed by scoring and plotting

pub mod error;
pub mod model;
pub mod plant;
pub mod sim;

pub use error::{SimError, SimResult};
pub use model::Plant;
pub use plant::{HUMIDITY_MAX, HUMIDITY_MIN, PlantParameters, SoilPlant};
pub use sim::{SimOptions, Sample, Trajectory, run_loop, sample_count, simulate};
