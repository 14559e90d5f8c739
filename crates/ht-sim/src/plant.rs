//! Soil humidity plant.
//!
//! Humidity (percent of saturation) rises at `pump_flow_rate` while the pump
//! runs and always falls at `evaporation_rate`. One explicit Euler step per
//! sample, clamped to the physical range:
//!
//! ```text
//! h' = clamp(h + [pump] * flow * dt - evap * dt, 0, 100)
//! ```

use crate::error::SimResult;
use crate::model::Plant;
use ht_core::{ensure_finite, ensure_in_range};
use serde::{Deserialize, Serialize};

pub const HUMIDITY_MIN: f64 = 0.0;
pub const HUMIDITY_MAX: f64 = 100.0;

/// Plant constants, fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParameters {
    /// Humidity gain while the pump is on (%/s).
    pub pump_flow_rate: f64,
    /// Humidity loss, always applied (%/s).
    pub evaporation_rate: f64,
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            pump_flow_rate: 5.0,
            evaporation_rate: 0.5,
        }
    }
}

impl PlantParameters {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.pump_flow_rate, "pump_flow_rate")?;
        ensure_finite(self.evaporation_rate, "evaporation_rate")?;
        Ok(())
    }
}

/// Soil humidity state plus its constants.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilPlant {
    params: PlantParameters,
    humidity: f64,
}

impl SoilPlant {
    /// # Errors
    ///
    /// Non-finite parameters or an initial humidity outside `[0, 100]`.
    pub fn new(params: PlantParameters, initial_humidity: f64) -> SimResult<Self> {
        params.validate()?;
        let humidity = ensure_in_range(
            initial_humidity,
            HUMIDITY_MIN,
            HUMIDITY_MAX,
            "initial humidity",
        )?;
        Ok(Self { params, humidity })
    }

    pub fn params(&self) -> PlantParameters {
        self.params
    }
}

impl Plant for SoilPlant {
    fn humidity(&self) -> f64 {
        self.humidity
    }

    /// `dt` is not validated here; a non-positive step is the caller's problem.
    fn step(&mut self, pump_on: bool, dt: f64) -> f64 {
        let mut h = self.humidity;
        if pump_on {
            h += self.params.pump_flow_rate * dt;
        }
        h -= self.params.evaporation_rate * dt;
        self.humidity = h.clamp(HUMIDITY_MIN, HUMIDITY_MAX);
        self.humidity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(h0: f64) -> SoilPlant {
        SoilPlant::new(PlantParameters::default(), h0).unwrap()
    }

    #[test]
    fn keeps_its_parameters() {
        let params = PlantParameters {
            pump_flow_rate: 4.0,
            evaporation_rate: 0.25,
        };
        let mut p = SoilPlant::new(params, 50.0).unwrap();
        p.step(true, 1.0);
        assert_eq!(p.params(), params);
        assert!((p.humidity() - 53.75).abs() < 1e-12);
    }

    #[test]
    fn pump_on_adds_flow_minus_evaporation() {
        let mut p = plant(20.0);
        let h = p.step(true, 0.3);
        assert!((h - 21.35).abs() < 1e-12);
        assert_eq!(p.humidity(), h);
    }

    #[test]
    fn pump_off_only_evaporates() {
        let mut p = plant(20.0);
        assert!((p.step(false, 0.3) - 19.85).abs() < 1e-12);
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut p = plant(0.1);
        assert_eq!(p.step(false, 1.0), 0.0);

        let mut p = plant(99.0);
        assert_eq!(p.step(true, 1.0), 100.0);
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(SoilPlant::new(PlantParameters::default(), 120.0).is_err());
        assert!(SoilPlant::new(PlantParameters::default(), -1.0).is_err());
        let params = PlantParameters {
            pump_flow_rate: f64::NAN,
            evaporation_rate: 0.5,
        };
        assert!(SoilPlant::new(params, 20.0).is_err());
    }
}
