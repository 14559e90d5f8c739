//! PID controller with integral clamping.
//!
//! The control law is the textbook parallel form evaluated once per sample:
//!
//! ```text
//! e      = sp - pv
//! P      = kp * e
//! acc    = clamp(acc + e * dt, -INTEGRAL_LIMIT, INTEGRAL_LIMIT)
//! I      = ki * acc
//! D      = kd * (e - e_prev) / dt
//! output = P + I + D
//! ```
//!
//! Anti-windup clamps the accumulator itself, before scaling by `ki`.
//! The derivative acts on the error (not the measurement), so the first
//! sample after construction sees a kick of `kd * e / dt`.

use crate::error::{ControlError, ControlResult};
use ht_core::{ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

/// Symmetric bound on the integral accumulator.
pub const INTEGRAL_LIMIT: f64 = 100.0;

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl ControllerGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Gains as `[kp, ki, kd]`, the layout used by the gain search.
    pub fn to_array(self) -> [f64; 3] {
        [self.kp, self.ki, self.kd]
    }

    pub fn from_slice(values: &[f64]) -> ControlResult<Self> {
        match values {
            [kp, ki, kd] => Ok(Self::new(*kp, *ki, *kd)),
            _ => Err(ControlError::InvalidParameter {
                what: "gain vector must have exactly three entries",
            }),
        }
    }

    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.kp, "kp")?;
        ensure_finite(self.ki, "ki")?;
        ensure_finite(self.kd, "kd")?;
        Ok(())
    }
}

/// Controller memory carried between samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator, always within `[-INTEGRAL_LIMIT, INTEGRAL_LIMIT]`.
    pub integral: f64,
    /// Error seen at the previous sample (0 before the first one).
    pub previous_error: f64,
}

/// One evaluation of the control law, with its individual terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidOutput {
    pub output: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

/// PID controller owning its gains and state.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    gains: ControllerGains,
    state: PidState,
}

impl PidController {
    /// Create a controller with zeroed state.
    ///
    /// # Errors
    ///
    /// Returns an error if any gain is not finite.
    pub fn new(gains: ControllerGains) -> ControlResult<Self> {
        gains.validate()?;
        Ok(Self {
            gains,
            state: PidState::default(),
        })
    }

    pub fn gains(&self) -> ControllerGains {
        self.gains
    }

    pub fn state(&self) -> PidState {
        self.state
    }

    /// Return to the freshly constructed state.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Compute controller output for one sample.
    ///
    /// # Arguments
    ///
    /// * `setpoint` - Desired value
    /// * `measurement` - Measured process variable
    /// * `dt` - Time since last sample (seconds), must be positive
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `dt` is not a finite positive number. The state is
    /// left untouched in that case.
    pub fn compute(&mut self, setpoint: f64, measurement: f64, dt: f64) -> ControlResult<PidOutput> {
        ensure_positive(dt, "dt must be positive")?;

        let error = setpoint - measurement;

        let p = self.gains.kp * error;

        let integral = (self.state.integral + error * dt).clamp(-INTEGRAL_LIMIT, INTEGRAL_LIMIT);
        let i = self.gains.ki * integral;

        let d = self.gains.kd * (error - self.state.previous_error) / dt;

        self.state = PidState {
            integral,
            previous_error: error,
        };

        Ok(PidOutput {
            output: p + i + d,
            p,
            i,
            d,
        })
    }
}
