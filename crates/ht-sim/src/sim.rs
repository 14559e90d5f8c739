//! Closed-loop runner and trajectory recording.

use crate::error::{SimError, SimResult};
use crate::model::Plant;
use crate::plant::{HUMIDITY_MAX, HUMIDITY_MIN, PlantParameters, SoilPlant};
use ht_controls::{ControllerGains, PidController, PumpPolicy};
use ht_core::{ensure_finite, ensure_in_range, ensure_positive};
use serde::{Deserialize, Serialize};

/// Options for a closed-loop run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Target humidity (%)
    pub setpoint: f64,
    /// Run length (seconds); samples cover `[0, duration)`
    pub duration: f64,
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Humidity at t = 0 (%)
    pub initial_humidity: f64,
    /// Plant constants
    pub plant: PlantParameters,
    /// Pump on/off policy
    pub pump: PumpPolicy,
    /// Maximum number of samples (safety limit)
    pub max_samples: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            setpoint: 60.0,
            duration: 60.0,
            dt: 0.3,
            initial_humidity: 20.0,
            plant: PlantParameters::default(),
            pump: PumpPolicy::default(),
            max_samples: 1_000_000,
        }
    }
}

impl SimOptions {
    /// Check every field without running anything.
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.dt, "dt must be positive")?;
        ensure_finite(self.duration, "duration")?;
        ensure_finite(self.setpoint, "setpoint")?;
        ensure_in_range(
            self.initial_humidity,
            HUMIDITY_MIN,
            HUMIDITY_MAX,
            "initial humidity",
        )?;
        self.plant.validate()?;
        PumpPolicy::new(self.pump.band)?;
        if self.max_samples == 0 {
            return Err(SimError::InvalidParameter {
                what: "max_samples must be positive",
            });
        }
        Ok(())
    }
}

/// Number of samples for a run: `ceil(duration / dt)`, or 0 when `duration <= 0`.
///
/// Sample `i` sits at `i as f64 * dt`, so every sample time is strictly below
/// `duration`. The count follows the floating point quotient as-is: a quotient
/// that lands a hair above an integer yields one extra sample.
///
/// # Errors
///
/// `InvalidParameter` if `dt` is not finite and positive, `TooManySamples` if
/// the count is not finite or exceeds `max_samples`.
pub fn sample_count(duration: f64, dt: f64, max_samples: usize) -> SimResult<usize> {
    let dt = ensure_positive(dt, "dt must be positive")?;
    if duration <= 0.0 {
        return Ok(0);
    }
    let n = (duration / dt).ceil();
    if !n.is_finite() || n > max_samples as f64 {
        return Err(SimError::TooManySamples {
            samples: n,
            limit: max_samples,
        });
    }
    Ok(n as usize)
}

/// One recorded instant of the loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time (seconds)
    pub time: f64,
    /// Humidity used for the control decision at `time` (before actuation)
    pub humidity: f64,
    /// Controller output
    pub output: f64,
    /// Proportional term
    pub p: f64,
    /// Integral term
    pub i: f64,
    /// Derivative term
    pub d: f64,
    /// Pump decision applied after this sample
    pub pump_on: bool,
}

/// Time-ordered record of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub setpoint: f64,
    pub duration: f64,
    pub samples: Vec<Sample>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn humidity(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.humidity).collect()
    }

    pub fn outputs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.output).collect()
    }

    /// Fraction of samples with the pump on (0 for an empty run).
    pub fn pump_duty(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let on = self.samples.iter().filter(|s| s.pump_on).count();
        on as f64 / self.samples.len() as f64
    }

    /// True when sample times are strictly increasing.
    pub fn is_time_ordered(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].time < w[1].time)
    }
}

/// Drive `plant` with `controller` over `opts.duration`.
///
/// At each sample the current humidity is recorded first, then the
/// controller runs, the pump policy decides, and the plant advances.
pub fn run_loop<P: Plant>(
    plant: &mut P,
    controller: &mut PidController,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    let dt = opts.dt;
    let n = sample_count(opts.duration, dt, opts.max_samples)?;

    let mut samples = Vec::with_capacity(n);
    for step in 0..n {
        let time = step as f64 * dt;
        let humidity = plant.humidity();

        let out = controller.compute(opts.setpoint, humidity, dt)?;
        let pump_on = opts.pump.pump_on(out.output, humidity, opts.setpoint);

        samples.push(Sample {
            time,
            humidity,
            output: out.output,
            p: out.p,
            i: out.i,
            d: out.d,
            pump_on,
        });

        plant.step(pump_on, dt);
    }

    Ok(Trajectory {
        setpoint: opts.setpoint,
        duration: opts.duration,
        samples,
    })
}

/// Run the soil plant under a fresh PID controller with the given gains.
pub fn simulate(gains: ControllerGains, opts: &SimOptions) -> SimResult<Trajectory> {
    opts.validate()?;

    let mut plant = SoilPlant::new(opts.plant, opts.initial_humidity)?;
    let mut controller = PidController::new(gains)?;
    let trajectory = run_loop(&mut plant, &mut controller, opts)?;

    tracing::debug!(
        kp = gains.kp,
        ki = gains.ki,
        kd = gains.kd,
        samples = trajectory.len(),
        final_humidity = plant.humidity(),
        "simulation finished"
    );

    Ok(trajectory)
}
