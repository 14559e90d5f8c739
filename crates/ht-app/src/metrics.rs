//! Closed-loop performance metrics and the scalar tuning score.
//!
//! From a trajectory and its setpoint:
//! - response time: first sample time with humidity >= 95 % of setpoint
//! - overshoot: peak deviation above setpoint, in percent of setpoint
//! - steady-state MSE and oscillation variance over the last 30 % of samples
//!
//! and the weighted score the gain search minimizes.

use ht_core::{mean_squared_deviation, variance};
use ht_sim::Trajectory;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Fraction of the setpoint that counts as "reached".
pub const RESPONSE_THRESHOLD: f64 = 0.95;
/// Start of the steady-state window as a fraction of the sample count.
pub const STEADY_WINDOW_START: f64 = 0.7;

pub const WEIGHT_RESPONSE_TIME: f64 = 0.3;
pub const WEIGHT_OVERSHOOT: f64 = 2.0;
pub const WEIGHT_STEADY_STATE: f64 = 10.0;
pub const WEIGHT_OSCILLATION: f64 = 5.0;

/// Performance of one run. Lower score is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// First time humidity reached 95 % of setpoint (seconds), or the run
    /// duration when it never did
    pub response_time: f64,
    /// `max(humidity - setpoint) / setpoint * 100`; negative when the
    /// setpoint was never reached
    pub overshoot_percent: f64,
    /// Mean squared error against setpoint over the trailing window
    pub steady_state_mse: f64,
    /// Population variance of humidity over the trailing window
    pub oscillation_variance: f64,
    /// Weighted sum of the above
    pub score: f64,
}

/// Score a trajectory against `setpoint`.
///
/// # Errors
///
/// `InvalidTrajectory` if sample times are not strictly increasing,
/// `InvalidInput` if the setpoint is zero or not finite.
pub fn score(trajectory: &Trajectory, setpoint: f64) -> AppResult<Metrics> {
    validate_setpoint(setpoint)?;
    if !trajectory.is_time_ordered() {
        return Err(AppError::InvalidTrajectory(
            "sample times must be strictly increasing".to_string(),
        ));
    }

    let humidity = trajectory.humidity();

    let response_time = response_time(trajectory, setpoint);

    let overshoot_percent = humidity
        .iter()
        .map(|h| h - setpoint)
        .reduce(f64::max)
        .map(|peak| peak / setpoint * 100.0)
        .unwrap_or(0.0);

    let window_start = (humidity.len() as f64 * STEADY_WINDOW_START) as usize;
    let window = &humidity[window_start..];
    let steady_state_mse = mean_squared_deviation(window, setpoint);
    let oscillation_variance = variance(window);

    let score = response_time * WEIGHT_RESPONSE_TIME
        + overshoot_percent.abs() * WEIGHT_OVERSHOOT
        + steady_state_mse * WEIGHT_STEADY_STATE
        + oscillation_variance * WEIGHT_OSCILLATION;

    Ok(Metrics {
        response_time,
        overshoot_percent,
        steady_state_mse,
        oscillation_variance,
        score,
    })
}

/// Overshoot is relative to the setpoint, so it must be finite and non-zero.
pub fn validate_setpoint(setpoint: f64) -> AppResult<()> {
    if !setpoint.is_finite() || setpoint == 0.0 {
        return Err(AppError::InvalidInput(format!(
            "setpoint must be finite and non-zero, got {}",
            setpoint
        )));
    }
    Ok(())
}

/// First crossing of the threshold, even if humidity later drops back.
fn response_time(trajectory: &Trajectory, setpoint: f64) -> f64 {
    let threshold = setpoint * RESPONSE_THRESHOLD;
    trajectory
        .samples
        .iter()
        .find(|s| s.humidity >= threshold)
        .map(|s| s.time)
        .unwrap_or(trajectory.duration.max(0.0))
}
