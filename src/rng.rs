//! Fallible randomness adapter.
//!
//! Scalar sampling in both backends goes through the infallible `RngCore`
//! methods, which panic or silently continue when the underlying source fails
//! depending on the generator. [`CheckedRng`] routes every request through
//! `try_fill_bytes` instead and remembers the first failure, so key generation
//! can report it as [`Error::RandomnessFailure`] rather than using bad output.

use rand_core::{CryptoRng, RngCore};

use crate::errors::Error;

/// Wraps a caller-supplied RNG and records the first error it reports.
pub(crate) struct CheckedRng<'a, R: RngCore + CryptoRng + ?Sized> {
    inner: &'a mut R,
    failure: Option<rand_core::Error>,
}

impl<'a, R: RngCore + CryptoRng + ?Sized> CheckedRng<'a, R> {
    pub(crate) fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            failure: None,
        }
    }

    /// Returns `Err` if any draw so far failed.
    pub(crate) fn check(&self) -> Result<(), Error> {
        match &self.failure {
            Some(err) => Err(Error::RandomnessFailure(err.to_string())),
            None => Ok(()),
        }
    }
}

impl<R: RngCore + CryptoRng + ?Sized> RngCore for CheckedRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.failure.is_some() {
            dest.fill(0);
            return;
        }
        if let Err(err) = self.inner.try_fill_bytes(dest) {
            dest.fill(0);
            self.failure = Some(err);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        match &self.failure {
            Some(_) => Err(rand_core::Error::new("randomness source failed earlier")),
            None => Ok(()),
        }
    }
}

impl<R: RngCore + CryptoRng + ?Sized> CryptoRng for CheckedRng<'_, R> {}
