//! Finite-difference gradients and box projection.

use crate::error::TuneResult;
use nalgebra::DVector;

/// Clamp each component of `x` into `[lower, upper]`.
pub fn project(x: &DVector<f64>, lower: &DVector<f64>, upper: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(
        x.len(),
        x.iter()
            .zip(lower.iter().zip(upper.iter()))
            .map(|(v, (lo, hi))| v.clamp(*lo, *hi)),
    )
}

/// Zero the gradient components that point out of the box at an active bound.
pub fn projected_gradient(
    x: &DVector<f64>,
    g: &DVector<f64>,
    lower: &DVector<f64>,
    upper: &DVector<f64>,
) -> DVector<f64> {
    let mut pg = g.clone();
    for i in 0..x.len() {
        let blocked_low = x[i] <= lower[i] && g[i] > 0.0;
        let blocked_high = x[i] >= upper[i] && g[i] < 0.0;
        if blocked_low || blocked_high {
            pg[i] = 0.0;
        }
    }
    pg
}

/// Forward-difference gradient that never probes outside the box.
///
/// For each component j, perturbs x[j] by `epsilon * max(|x[j]|, 1)`. When the
/// forward probe would cross the upper bound the difference is taken backward
/// instead. A component whose box is narrower than the probe gets a zero
/// derivative.
pub fn bounded_forward_gradient<F>(
    x: &DVector<f64>,
    f_x: f64,
    mut f: F,
    lower: &DVector<f64>,
    upper: &DVector<f64>,
    epsilon: f64,
) -> TuneResult<DVector<f64>>
where
    F: FnMut(&DVector<f64>) -> TuneResult<f64>,
{
    let n = x.len();
    let mut grad = DVector::zeros(n);

    for j in 0..n {
        let mut dx = epsilon * x[j].abs().max(1.0);
        if x[j] + dx > upper[j] {
            dx = -dx;
        }
        if x[j] + dx < lower[j] {
            continue;
        }

        let mut x_perturbed = x.clone();
        x_perturbed[j] += dx;
        let f_perturbed = f(&x_perturbed)?;
        grad[j] = (f_perturbed - f_x) / dx;
    }

    Ok(grad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(values: &[f64]) -> DVector<f64> {
        DVector::from_column_slice(values)
    }

    #[test]
    fn projection_clamps_each_component() {
        let x = v(&[-1.0, 0.5, 9.0]);
        let p = project(&x, &v(&[0.0, 0.0, 0.0]), &v(&[1.0, 1.0, 1.0]));
        assert_eq!(p, v(&[0.0, 0.5, 1.0]));
    }

    #[test]
    fn projected_gradient_masks_active_bounds() {
        let lower = v(&[0.0, 0.0, 0.0]);
        let upper = v(&[1.0, 1.0, 1.0]);
        let x = v(&[0.0, 1.0, 0.5]);
        let g = v(&[2.0, -3.0, 4.0]);
        assert_eq!(projected_gradient(&x, &g, &lower, &upper), v(&[0.0, 0.0, 4.0]));

        // gradient pointing into the box is kept
        let g = v(&[-2.0, 3.0, 4.0]);
        assert_eq!(projected_gradient(&x, &g, &lower, &upper), g);
    }

    #[test]
    fn quadratic_gradient() {
        let f = |x: &DVector<f64>| -> TuneResult<f64> { Ok(x[0] * x[0] + 3.0 * x[1]) };
        let x = v(&[2.0, 1.0]);
        let fx = f(&x).unwrap();
        let g = bounded_forward_gradient(&x, fx, f, &v(&[-10.0, -10.0]), &v(&[10.0, 10.0]), 1e-7)
            .unwrap();
        assert!((g[0] - 4.0).abs() < 1e-4);
        assert!((g[1] - 3.0).abs() < 1e-4);
    }

    #[test]
    fn backward_difference_at_upper_bound() {
        let mut probes = Vec::new();
        let f = |x: &DVector<f64>| -> TuneResult<f64> {
            probes.push(x[0]);
            Ok(2.0 * x[0])
        };
        let x = v(&[1.0]);
        let g = bounded_forward_gradient(&x, 2.0, f, &v(&[0.0]), &v(&[1.0]), 1e-6).unwrap();
        assert!((g[0] - 2.0).abs() < 1e-6);
        assert!(probes.iter().all(|p| *p <= 1.0));
    }

    #[test]
    fn degenerate_box_has_zero_derivative() {
        let f = |x: &DVector<f64>| -> TuneResult<f64> { Ok(5.0 * x[0]) };
        let x = v(&[1.0]);
        let g = bounded_forward_gradient(&x, 5.0, f, &v(&[1.0]), &v(&[1.0]), 1e-6).unwrap();
        assert_eq!(g[0], 0.0);
    }
}
