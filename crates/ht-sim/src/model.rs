//! Plant trait for pluggable process models.

/// A single-output process advanced by an on/off actuator.
///
/// A Plant must implement:
/// - the current measurement (read before each control decision)
/// - a step that applies the actuator for `dt` seconds and returns the new measurement
pub trait Plant {
    /// Current measured value.
    fn humidity(&self) -> f64;

    /// Advance one step with the pump on or off; returns the new humidity.
    fn step(&mut self, pump_on: bool, dt: f64) -> f64;
}
