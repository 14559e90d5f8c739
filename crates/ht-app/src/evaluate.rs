//! Single closed-loop evaluation: simulate, then score.

use ht_controls::ControllerGains;
use ht_sim::{SimOptions, Trajectory, simulate};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::metrics::{Metrics, score};

/// Gains, the run they produced, and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub gains: ControllerGains,
    pub trajectory: Trajectory,
    pub metrics: Metrics,
}

/// Run one simulation with fresh plant and controller state and score it.
pub fn evaluate(gains: ControllerGains, opts: &SimOptions) -> AppResult<Evaluation> {
    let trajectory = simulate(gains, opts)?;
    let metrics = score(&trajectory, opts.setpoint)?;
    Ok(Evaluation {
        gains,
        trajectory,
        metrics,
    })
}

/// Score of a gain triple; the function the gain search minimizes.
pub fn objective(gains: ControllerGains, opts: &SimOptions) -> AppResult<f64> {
    let trajectory = simulate(gains, opts)?;
    Ok(score(&trajectory, opts.setpoint)?.score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_matches_objective() {
        let opts = SimOptions::default();
        let gains = ControllerGains::new(3.0, 0.5, 1.0);
        let eval = evaluate(gains, &opts).unwrap();
        assert_eq!(eval.metrics.score, objective(gains, &opts).unwrap());
        assert_eq!(eval.gains, gains);
        assert_eq!(eval.trajectory.len(), 200);
    }

    #[test]
    fn deterministic() {
        let opts = SimOptions::default();
        let gains = ControllerGains::new(1.0, 0.01, 5.0);
        assert_eq!(evaluate(gains, &opts).unwrap(), evaluate(gains, &opts).unwrap());
    }
}
