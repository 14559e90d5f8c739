//! Projected BFGS with backtracking line search.

use crate::error::{TuneError, TuneResult};
use crate::gradient::{bounded_forward_gradient, project, projected_gradient};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Minimizer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizerConfig {
    /// Maximum quasi-Newton iterations
    pub max_iterations: usize,
    /// Stop when the largest projected-gradient component falls below this
    pub pgtol: f64,
    /// Stop when the relative decrease of an accepted step falls below this
    pub ftol: f64,
    /// Relative finite-difference step for gradients
    pub gradient_step: f64,
    /// Sufficient-decrease constant for the Armijo test
    pub armijo_c1: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            pgtol: 1e-5,
            ftol: 2.2e-9,
            gradient_step: 1e-8,
            armijo_c1: 1e-4,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

/// Why the minimizer stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Projected gradient below `pgtol`.
    ProjectedGradient,
    /// Relative decrease below `ftol`.
    FunctionTolerance,
    /// No step along the steepest-descent direction decreased the objective.
    LineSearchStalled,
    /// `max_iterations` reached.
    MaxIterations,
}

impl Termination {
    pub fn converged(self) -> bool {
        matches!(
            self,
            Termination::ProjectedGradient | Termination::FunctionTolerance
        )
    }
}

/// Outcome of a bounded minimization.
#[derive(Clone, Debug)]
pub struct MinimizeResult {
    /// Best point found (always inside the box)
    pub x: DVector<f64>,
    /// Objective at `x`
    pub value: f64,
    /// Objective at the projected starting point
    pub initial_value: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Number of objective evaluations, gradients included
    pub evaluations: usize,
    /// Converged flag
    pub converged: bool,
    pub termination: Termination,
}

/// Objective wrapper that counts calls and rejects non-finite values.
struct Counted<F> {
    f: F,
    count: usize,
}

impl<F> Counted<F>
where
    F: FnMut(&DVector<f64>) -> TuneResult<f64>,
{
    fn eval(&mut self, x: &DVector<f64>) -> TuneResult<f64> {
        self.count += 1;
        let value = (self.f)(x)?;
        if !value.is_finite() {
            return Err(TuneError::NonFinite {
                x: x.iter().copied().collect(),
            });
        }
        Ok(value)
    }
}

/// Minimize `objective` over the box `bounds` starting from `x0`.
///
/// The starting point is projected into the box first. Every accepted step
/// satisfies an Armijo condition on the projected step, so the returned value
/// never exceeds `initial_value`. A result is returned even when the search
/// stalls or runs out of iterations; only setup and objective errors fail.
pub fn minimize_bounded<F>(
    objective: F,
    x0: &[f64],
    bounds: &[(f64, f64)],
    config: &MinimizerConfig,
) -> TuneResult<MinimizeResult>
where
    F: FnMut(&DVector<f64>) -> TuneResult<f64>,
{
    validate_problem(x0, bounds, config)?;

    let n = x0.len();
    let lower = DVector::from_iterator(n, bounds.iter().map(|b| b.0));
    let upper = DVector::from_iterator(n, bounds.iter().map(|b| b.1));
    let identity = DMatrix::<f64>::identity(n, n);

    let mut obj = Counted {
        f: objective,
        count: 0,
    };

    let mut x = project(&DVector::from_column_slice(x0), &lower, &upper);
    let mut f = obj.eval(&x)?;
    let initial_value = f;
    let mut g = bounded_forward_gradient(
        &x,
        f,
        |p| obj.eval(p),
        &lower,
        &upper,
        config.gradient_step,
    )?;

    // Inverse Hessian approximation
    let mut h = identity.clone();
    let mut h_fresh = true;
    let mut iterations = 0;

    let termination = loop {
        if iterations >= config.max_iterations {
            break Termination::MaxIterations;
        }

        let pg = projected_gradient(&x, &g, &lower, &upper);
        if pg.amax() < config.pgtol {
            break Termination::ProjectedGradient;
        }

        let mut d = -(&h * &pg);
        for i in 0..n {
            if pg[i] == 0.0 {
                d[i] = 0.0;
            }
        }
        if d.dot(&pg) >= 0.0 {
            h = identity.clone();
            h_fresh = true;
            d = -pg.clone();
        }

        let Some((x_new, f_new, alpha)) =
            line_search(&mut obj, &x, f, &pg, &d, &lower, &upper, config)?
        else {
            if !h_fresh {
                // Curvature model went bad; retry along steepest descent.
                h = identity.clone();
                h_fresh = true;
                iterations += 1;
                continue;
            }
            tracing::warn!(iteration = iterations, value = f, "line search stalled");
            break Termination::LineSearchStalled;
        };

        iterations += 1;
        tracing::debug!(iteration = iterations, value = f_new, alpha, "step accepted");

        let small_decrease = (f - f_new) <= config.ftol * f.abs().max(f_new.abs()).max(1.0);
        let s = &x_new - &x;
        x = x_new;
        f = f_new;
        if small_decrease {
            break Termination::FunctionTolerance;
        }

        let g_new = bounded_forward_gradient(
            &x,
            f,
            |p| obj.eval(p),
            &lower,
            &upper,
            config.gradient_step,
        )?;
        let y = &g_new - &g;
        g = g_new;

        let sy = s.dot(&y);
        if sy > 1e-10 {
            // H <- (I - rho s y^T) H (I - rho y s^T) + rho s s^T
            let rho = 1.0 / sy;
            let a = &identity - (&s * y.transpose()) * rho;
            h = &a * &h * a.transpose() + (&s * s.transpose()) * rho;
            h_fresh = false;
        }
    };

    Ok(MinimizeResult {
        x,
        value: f,
        initial_value,
        iterations,
        evaluations: obj.count,
        converged: termination.converged(),
        termination,
    })
}

/// Backtrack along `d` (projected onto the box) until the Armijo condition holds.
#[allow(clippy::too_many_arguments)]
fn line_search<F>(
    obj: &mut Counted<F>,
    x: &DVector<f64>,
    f: f64,
    pg: &DVector<f64>,
    d: &DVector<f64>,
    lower: &DVector<f64>,
    upper: &DVector<f64>,
    config: &MinimizerConfig,
) -> TuneResult<Option<(DVector<f64>, f64, f64)>>
where
    F: FnMut(&DVector<f64>) -> TuneResult<f64>,
{
    let mut alpha = 1.0;
    for _ in 0..config.max_line_search_iters {
        let x_new = project(&(x + d * alpha), lower, upper);
        let s = &x_new - x;
        if s.norm() > 0.0 {
            let f_new = obj.eval(&x_new)?;
            // projection can bend the step off the descent direction;
            // accepted steps must still strictly decrease f
            if f_new < f && f_new <= f + config.armijo_c1 * pg.dot(&s) {
                return Ok(Some((x_new, f_new, alpha)));
            }
        }
        alpha *= config.line_search_beta;
    }
    Ok(None)
}

fn validate_problem(x0: &[f64], bounds: &[(f64, f64)], config: &MinimizerConfig) -> TuneResult<()> {
    if x0.is_empty() {
        return Err(TuneError::ProblemSetup {
            what: "starting point is empty".to_string(),
        });
    }
    if x0.len() != bounds.len() {
        return Err(TuneError::ProblemSetup {
            what: format!(
                "starting point has {} entries but {} bounds were given",
                x0.len(),
                bounds.len()
            ),
        });
    }
    for (i, (v, (lo, hi))) in x0.iter().zip(bounds).enumerate() {
        if !v.is_finite() {
            return Err(TuneError::ProblemSetup {
                what: format!("starting point component {} is not finite", i),
            });
        }
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(TuneError::ProblemSetup {
                what: format!("bounds for component {} are invalid: [{}, {}]", i, lo, hi),
            });
        }
    }
    let step_ok = config.gradient_step.is_finite() && config.gradient_step > 0.0;
    let beta_ok = config.line_search_beta > 0.0 && config.line_search_beta < 1.0;
    if !step_ok || !beta_ok {
        return Err(TuneError::ProblemSetup {
            what: "gradient_step must be positive and line_search_beta in (0, 1)".to_string(),
        });
    }
    Ok(())
}
