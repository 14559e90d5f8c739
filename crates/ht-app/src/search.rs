//! Gain search: minimize the closed-loop score over a box of gains.
//!
//! The objective is piecewise constant in places (the response-time threshold
//! and the pump dead band switch discretely), so the local minimizer may stop
//! at the starting point or at different optima depending on where it starts.

use ht_controls::ControllerGains;
use ht_sim::SimOptions;
use ht_tune::{MinimizerConfig, Termination, TuneError, TuneResult, minimize_bounded};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::evaluate::objective;
use crate::metrics::validate_setpoint;

/// Inclusive `(min, max)` box for each gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainBounds {
    pub kp: (f64, f64),
    pub ki: (f64, f64),
    pub kd: (f64, f64),
}

impl Default for GainBounds {
    fn default() -> Self {
        Self {
            kp: (0.1, 10.0),
            ki: (0.01, 2.0),
            kd: (0.01, 5.0),
        }
    }
}

impl GainBounds {
    pub fn to_array(self) -> [(f64, f64); 3] {
        [self.kp, self.ki, self.kd]
    }

    pub fn contains(&self, gains: &ControllerGains) -> bool {
        self.to_array()
            .iter()
            .zip(gains.to_array())
            .all(|(&(lo, hi), v)| (lo..=hi).contains(&v))
    }

    pub fn validate(&self) -> AppResult<()> {
        for (name, (lo, hi)) in ["kp", "ki", "kd"].iter().zip(self.to_array()) {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(AppError::InvalidParameter(format!(
                    "bounds for {} are invalid: [{}, {}]",
                    name, lo, hi
                )));
            }
        }
        Ok(())
    }
}

/// Everything the search needs besides the simulation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub initial_guess: ControllerGains,
    pub bounds: GainBounds,
    pub minimizer: MinimizerConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            initial_guess: ControllerGains::new(2.0, 0.3, 0.5),
            bounds: GainBounds::default(),
            minimizer: MinimizerConfig::default(),
        }
    }
}

/// Best gains found by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub gains: ControllerGains,
    pub score: f64,
    /// Score at the (box-projected) initial guess
    pub initial_score: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    pub termination: Termination,
}

/// Minimize the score over `bounds` starting from `initial_guess`.
///
/// Always returns the best point seen, also when the minimizer stalls on a
/// bound or runs out of iterations.
pub fn search(
    initial_guess: ControllerGains,
    bounds: &GainBounds,
    opts: &SimOptions,
    minimizer: &MinimizerConfig,
) -> AppResult<SearchResult> {
    opts.validate()?;
    validate_setpoint(opts.setpoint)?;
    initial_guess.validate()?;
    bounds.validate()?;

    tracing::info!(
        kp = initial_guess.kp,
        ki = initial_guess.ki,
        kd = initial_guess.kd,
        "starting gain search"
    );

    let f = |x: &DVector<f64>| -> TuneResult<f64> {
        let gains = ControllerGains::from_slice(x.as_slice())
            .map_err(|e| TuneError::Objective {
                message: e.to_string(),
            })?;
        objective(gains, opts).map_err(|e| TuneError::Objective {
            message: e.to_string(),
        })
    };

    let result = minimize_bounded(f, &initial_guess.to_array(), &bounds.to_array(), minimizer)?;
    let gains = ControllerGains::from_slice(result.x.as_slice())?;

    tracing::info!(
        kp = gains.kp,
        ki = gains.ki,
        kd = gains.kd,
        score = result.value,
        initial_score = result.initial_value,
        iterations = result.iterations,
        evaluations = result.evaluations,
        termination = ?result.termination,
        "gain search finished"
    );

    Ok(SearchResult {
        gains,
        score: result.value,
        initial_score: result.initial_value,
        iterations: result.iterations,
        evaluations: result.evaluations,
        converged: result.converged,
        termination: result.termination,
    })
}

pub fn search_with_config(config: &SearchConfig, opts: &SimOptions) -> AppResult<SearchResult> {
    search(config.initial_guess, &config.bounds, opts, &config.minimizer)
}
