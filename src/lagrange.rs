//! Lagrange interpolation at zero.
//!
//! Given distinct node indices `x_1, ..., x_m`, the coefficient of node `k` is
//!
//! ```text
//! λ_k = Π_{j≠k} (0 - x_j) / (x_k - x_j)
//! ```
//!
//! so that `f(0) = Σ λ_k · f(x_k)` for any polynomial of degree `< m`. The same
//! coefficients recover a group element `f(0)·P` from the points `f(x_k)·P`,
//! which is how partial signatures combine into a group signature.

use rayon::prelude::*;

use crate::backend::{CurvePoint, FieldElement};
use crate::errors::Error;

/// Inverts every element in place using Montgomery's trick.
///
/// Returns the position of the first zero element if there is one, leaving
/// `values` untouched.
pub(crate) fn batch_inversion<F: FieldElement>(values: &mut [F]) -> Result<(), usize> {
    if let Some(pos) = values.iter().position(|v| *v == F::zero()) {
        return Err(pos);
    }

    // prefix[i] = v_0 · ... · v_{i-1}
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for v in values.iter() {
        prefix.push(acc);
        acc = acc * *v;
    }

    let mut inv = acc.invert().ok_or(0usize)?;
    for (v, pre) in values.iter_mut().zip(prefix).rev() {
        let next = inv * *v;
        *v = inv * pre;
        inv = next;
    }
    Ok(())
}

/// Computes the Lagrange coefficients at zero for the given node indices.
///
/// Indices must be non-zero. A repeated index makes a denominator vanish and
/// is reported as [`Error::DuplicateShare`].
pub fn lagrange_coefficients_at_zero<F: FieldElement>(indices: &[usize]) -> Result<Vec<F>, Error> {
    let xs: Vec<F> = indices.iter().map(|&i| F::from_u64(i as u64)).collect();

    let mut numerators = Vec::with_capacity(xs.len());
    let mut denominators = Vec::with_capacity(xs.len());
    for (k, x_k) in xs.iter().enumerate() {
        let mut num = F::one();
        let mut den = F::one();
        for (j, x_j) in xs.iter().enumerate() {
            if j == k {
                continue;
            }
            num = num * -*x_j;
            den = den * (*x_k - *x_j);
        }
        numerators.push(num);
        denominators.push(den);
    }

    batch_inversion(&mut denominators).map_err(|pos| Error::DuplicateShare(indices[pos]))?;

    Ok(numerators
        .into_iter()
        .zip(denominators)
        .map(|(num, den_inv)| num * den_inv)
        .collect())
}

/// Interpolates `f(0)·P` from the evaluations `(x_k, f(x_k)·P)`.
pub fn interpolate_at_zero<F, P>(points: &[(usize, P)]) -> Result<P, Error>
where
    F: FieldElement,
    P: CurvePoint<F>,
{
    let indices: Vec<usize> = points.iter().map(|(i, _)| *i).collect();
    let coefficients = lagrange_coefficients_at_zero::<F>(&indices)?;
    Ok(points
        .par_iter()
        .zip(coefficients.par_iter())
        .map(|((_, point), lambda)| point.mul_scalar(lambda))
        .reduce(P::identity, |a, b| a.add(&b)))
}
