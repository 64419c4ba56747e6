//! Secret sharing polynomial.
//!
//! A [`SecretPolynomial`] of degree `t - 1` hides the master secret in its
//! constant term. Evaluating it at node indices `1..=n` yields the Shamir
//! shares. The polynomial lives only for the duration of key generation and is
//! wiped when dropped.

use core::sync::atomic::{Ordering, compiler_fence};

use rand_core::RngCore;
use zeroize::Zeroize;

use crate::backend::FieldElement;

/// Overwrites a secret scalar with zero in a way the optimizer keeps.
pub(crate) fn clear_scalar<F: FieldElement>(value: &mut F) {
    // SAFETY: `value` is an exclusive, aligned reference to an initialized `F`.
    unsafe { core::ptr::write_volatile(value, F::zero()) };
    compiler_fence(Ordering::SeqCst);
}

/// Coefficients in ascending order; `coeffs[0]` is the master secret.
pub(crate) struct SecretPolynomial<F: FieldElement> {
    coeffs: Vec<F>,
}

impl<F: FieldElement> SecretPolynomial<F> {
    /// Samples `threshold` coefficients uniformly at random.
    pub(crate) fn random<R: RngCore + ?Sized>(threshold: usize, rng: &mut R) -> Self {
        let coeffs = (0..threshold).map(|_| F::random(rng)).collect();
        Self { coeffs }
    }

    #[cfg(test)]
    pub(crate) fn from_coefficients(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    pub(crate) fn constant_term(&self) -> F {
        self.coeffs.first().copied().unwrap_or_else(F::zero)
    }

    /// Evaluate the polynomial at `point` using Horner's method.
    pub(crate) fn evaluate(&self, point: &F) -> F {
        self.coeffs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coeff| acc * *point + *coeff)
    }
}

impl<F: FieldElement> Zeroize for SecretPolynomial<F> {
    fn zeroize(&mut self) {
        self.coeffs.iter_mut().for_each(clear_scalar);
    }
}

impl<F: FieldElement> Drop for SecretPolynomial<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}
