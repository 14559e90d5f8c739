//! On/off pump actuation.
//!
//! The pump has no analog input: each sample the controller output is reduced
//! to a boolean. The pump runs only when the controller asks for more water
//! *and* humidity is still below a dead band under the setpoint. Inside the
//! band the pump stays off even if the output is still positive, which keeps
//! the humidity from running past the setpoint.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// Default width of the low-side dead band (humidity %).
pub const DEFAULT_HYSTERESIS_BAND: f64 = 3.0;

/// Pump on/off decision with a one-sided hysteresis band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpPolicy {
    /// Band width below the setpoint where the pump is held off.
    pub band: f64,
}

impl Default for PumpPolicy {
    fn default() -> Self {
        Self {
            band: DEFAULT_HYSTERESIS_BAND,
        }
    }
}

impl PumpPolicy {
    /// # Errors
    ///
    /// Returns error if `band` is negative or not finite.
    pub fn new(band: f64) -> ControlResult<Self> {
        if !band.is_finite() || band < 0.0 {
            return Err(ControlError::InvalidParameter {
                what: "hysteresis band must be finite and non-negative",
            });
        }
        Ok(Self { band })
    }

    /// Pump is on iff `output > 0` and `humidity < setpoint - band`.
    pub fn pump_on(&self, output: f64, humidity: f64, setpoint: f64) -> bool {
        output > 0.0 && humidity < setpoint - self.band
    }
}
