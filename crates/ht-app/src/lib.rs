//! Application layer for hydrotune.
//!
//! Turns closed-loop runs into scores and builds the tuning workflows on top:
//! single evaluation, bounded gain search, and preset comparison. Scenario
//! configuration and text rendering live here too so the CLI stays thin.

pub mod compare;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod report;
pub mod scenario;
pub mod search;

pub use compare::{Comparison, Preset, RankedEntry, compare, default_presets};
pub use error::{AppError, AppResult};
pub use evaluate::{Evaluation, evaluate, objective};
pub use metrics::{Metrics, score, validate_setpoint};
pub use scenario::{Scenario, load_scenario, parse_scenario, scenario_to_yaml, validate_scenario};
pub use search::{GainBounds, SearchConfig, SearchResult, search, search_with_config};

pub use ht_controls::ControllerGains;
pub use ht_sim::{SimOptions, Trajectory};
