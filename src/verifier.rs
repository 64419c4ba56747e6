//! Dual-backend signature verification.
//!
//! A group signature is accepted only if two independent pairing
//! implementations agree that
//!
//! ```text
//! e(G1, σ) · e(pk, -H(m)) == 1
//! ```
//!
//! Backend A evaluates the product on the in-memory points it was handed.
//! Backend B starts from the 96/192-byte encodings produced by backend A,
//! decodes and validates them itself, hashes the message with its own
//! hash-to-curve, and evaluates the same product. Both run concurrently and a
//! disagreement is an error, never a quiet "invalid".
//!
//! # Example
//!
//! ```rust
//! use tbls::{BlstBackend, ThresholdBls, ThresholdScheme, Verifier};
//! use rand::thread_rng;
//!
//! # fn main() -> Result<(), tbls::Error> {
//! let scheme = ThresholdBls::<BlstBackend>::default();
//! let keys = scheme.initialize(&mut thread_rng(), 2, 3)?;
//! let signature = scheme.sign(&keys, b"payload", &[1, 2])?;
//!
//! let verifier = Verifier::new();
//! assert!(verifier.verify(b"payload", &signature, keys.group_public_key())?.is_valid);
//! assert!(!verifier.verify(b"tampered", &signature, keys.group_public_key())?.is_valid);
//! # Ok(())
//! # }
//! ```

use core::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    backend::{ArkworksBls12, BlstBackend, CurvePoint, PairingBackend},
    config::CIPHERSUITE_DST,
    errors::{BackendError, Error},
    protocol::{GroupSignature, PartialSignature, PublicKey},
};

/// Outcome of a dual-backend verification.
///
/// Only produced when both backends agree, so `is_valid` equals either verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub backend_a_verdict: bool,
    pub backend_b_verdict: bool,
    pub is_valid: bool,
}

/// Evaluates the BLS predicate on one backend.
///
/// An identity public key never verifies: it would accept the identity
/// signature for every message.
fn bls_predicate<B: PairingBackend>(
    message: &[u8],
    signature: &B::G2,
    public_key: &B::G1,
) -> Result<bool, BackendError> {
    if public_key.is_identity() {
        return Ok(false);
    }
    let hashed = B::hash_to_g2(message, CIPHERSUITE_DST)?;
    B::pairing_check(
        &[B::G1::generator(), *public_key],
        &[*signature, hashed.negate()],
    )
}

/// Verifies group signatures on backend `A` and cross-checks on backend `D`.
///
/// Defaults to blstrs for the native check and arkworks for the decoded one.
/// Both are zero-sized, so constructing a verifier is free.
#[derive(Debug)]
pub struct Verifier<A: PairingBackend = BlstBackend, D: PairingBackend = ArkworksBls12>(
    PhantomData<(A, D)>,
);

impl<A: PairingBackend, D: PairingBackend> Default for Verifier<A, D> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: PairingBackend, D: PairingBackend> Verifier<A, D> {
    /// Verifies `signature` on `message` against `public_key`.
    ///
    /// # Errors
    ///
    /// - [`Error::BackendMismatch`] if the two backends reach different verdicts.
    /// - [`Error::CurveMembershipError`] / [`Error::DeserializationError`] if
    ///   backend `D` rejects an encoding produced by backend `A`.
    /// - [`Error::PairingCheckFailure`] if either backend fails internally.
    ///
    /// Both checks always run to completion before any error is returned.
    #[instrument(
        level = "info",
        skip_all,
        fields(message_len = message.len(), backend_a = %A::ID, backend_b = %D::ID)
    )]
    pub fn verify(
        &self,
        message: &[u8],
        signature: &GroupSignature<A>,
        public_key: &PublicKey<A>,
    ) -> Result<VerificationResult, Error> {
        let signature_bytes = signature.to_bytes();
        let public_key_bytes = public_key.to_bytes();

        let (native, decoded) = rayon::join(
            || bls_predicate::<A>(message, signature.point(), public_key.point()),
            || {
                let signature = D::decode_g2(&signature_bytes)?;
                let public_key = D::decode_g1(&public_key_bytes)?;
                bls_predicate::<D>(message, &signature, &public_key)
            },
        );
        let backend_a_verdict = native?;
        let backend_b_verdict = decoded?;

        if backend_a_verdict != backend_b_verdict {
            warn!(
                backend_a_verdict,
                backend_b_verdict, "verification backends disagree"
            );
            return Err(Error::BackendMismatch {
                backend_a: backend_a_verdict,
                backend_b: backend_b_verdict,
            });
        }

        debug!(is_valid = backend_a_verdict, "signature checked");
        Ok(VerificationResult {
            backend_a_verdict,
            backend_b_verdict,
            is_valid: backend_a_verdict,
        })
    }

    /// Decodes the encoded artifacts with backend `A`, then runs [`Self::verify`].
    pub fn verify_bytes(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<VerificationResult, Error> {
        let signature = GroupSignature::<A>::from_bytes(signature)?;
        let public_key = PublicKey::<A>::from_bytes(public_key)?;
        self.verify(message, &signature, &public_key)
    }

    /// Checks one partial signature against its node's public share.
    ///
    /// Runs on backend `A` only. A coordinator can use it to drop a faulty
    /// share before recovery.
    #[instrument(level = "debug", skip_all, fields(index = partial.index))]
    pub fn verify_partial(
        &self,
        message: &[u8],
        partial: &PartialSignature<A>,
        public_share: &PublicKey<A>,
    ) -> Result<bool, Error> {
        Ok(bls_predicate::<A>(
            message,
            &partial.point,
            public_share.point(),
        )?)
    }
}
