use crate::{HtError, HtResult};

/// Floating point type used throughout the system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> HtResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HtError::NonFinite { what, value: v })
    }
}

/// Accept only finite, strictly positive values (time steps, rates of change).
pub fn ensure_positive(v: Real, what: &'static str) -> HtResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HtError::InvalidParameter { what })
    }
}

pub fn ensure_in_range(v: Real, min: Real, max: Real, what: &'static str) -> HtResult<Real> {
    let v = ensure_finite(v, what)?;
    if (min..=max).contains(&v) {
        Ok(v)
    } else {
        Err(HtError::OutOfRange {
            what,
            value: v,
            min,
            max,
        })
    }
}

/// Population variance (divides by `n`). Returns 0 for an empty slice.
pub fn variance(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as Real;
    let mean = values.iter().sum::<Real>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<Real>() / n
}

/// Mean squared deviation from `target`. Returns 0 for an empty slice.
pub fn mean_squared_deviation(values: &[Real], target: Real) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - target) * (v - target)).sum::<Real>() / values.len() as Real
}
