//! # tbls: Threshold BLS Signatures with Dual-Backend Verification
//!
//! `tbls` implements `(t, n)` threshold BLS signatures over BLS12-381. A
//! trusted dealer splits a master key among `n` nodes so that any `t` of them
//! jointly produce exactly the signature the master key would have produced.
//! Fewer than `t` nodes can neither forge a signature nor learn the master
//! secret.
//!
//! ## Overview
//!
//! Public keys live in G1 and signatures in G2, following the proof-of-possession
//! ciphersuite `BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_`. Verification
//! evaluates the pairing equation on two independently implemented backends
//! and only returns a verdict when both agree.
//!
//! ## Architecture
//!
//! - **[`backend`]**: Trait abstractions ([`FieldElement`](backend::FieldElement),
//!   [`CurvePoint`](backend::CurvePoint), [`PairingBackend`]) and the two
//!   BLS12-381 implementations, [`BlstBackend`] and [`ArkworksBls12`], including
//!   the byte encoding they share.
//!
//! - **[`protocol`]**: The [`ThresholdScheme`] trait and its [`ThresholdBls`]
//!   implementation, along with [`Node`], [`SignatureScheme`], [`PublicKey`],
//!   [`PartialSignature`] and [`GroupSignature`].
//!
//! - **[`verifier`]**: [`Verifier`], which cross-checks signatures on two
//!   backends.
//!
//! - **[`lagrange`]**: Lagrange coefficients at zero and interpolation in the
//!   exponent.
//!
//! - **[`config`]**: [`SchemeParameters`], [`BackendId`] and the ciphersuite
//!   tag [`CIPHERSUITE_DST`].
//!
//! - **[`errors`]**: Error types for backend and protocol operations.
//!
//! ## Quick Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use tbls::{BlstBackend, ThresholdBls, ThresholdScheme, Verifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = StdRng::from_entropy();
//! let scheme = ThresholdBls::<BlstBackend>::default();
//!
//! // 3-of-5: any three nodes can sign
//! let keys = scheme.initialize(&mut rng, 3, 5)?;
//!
//! // Each participating node signs, the shares are combined
//! let partials = [1, 3, 5]
//!     .iter()
//!     .map(|&i| scheme.partial_sign(keys.node(i)?, b"hello"))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let signature = scheme.recover(&partials, keys.params())?;
//!
//! // Any other qualified subset gives the same signature
//! assert_eq!(signature, scheme.sign(&keys, b"hello", &[2, 3, 4])?);
//!
//! // blstrs and arkworks must both accept it
//! let result = Verifier::new().verify(b"hello", &signature, keys.group_public_key())?;
//! assert!(result.is_valid);
//! # Ok(())
//! # }
//! ```
//!
//! ## Protocol Workflow
//!
//! 1. **Initialization**: [`ThresholdScheme::initialize`] samples the secret
//!    polynomial and derives every node's share and public share in parallel.
//!
//! 2. **Partial Signing**: [`ThresholdScheme::partial_sign`] multiplies the
//!    hashed message by one node's share.
//!
//! 3. **Recovery**: [`ThresholdScheme::recover`] interpolates at least `t`
//!    partial signatures at zero. [`ThresholdScheme::sign`] runs steps 2 and 3
//!    for a list of node indices.
//!
//! 4. **Verification**: [`Verifier::verify`] checks the signature on blstrs
//!    and, from the encoded bytes, on arkworks.
//!
//! ## Encoding
//!
//! Public keys are 96 bytes (`X ‖ Y`) and signatures 192 bytes
//! (`X.c1 ‖ X.c0 ‖ Y.c1 ‖ Y.c0`), every coordinate a 48-byte big-endian
//! integer. Both print as lowercase hex and serialize through serde.
//!
//! ## Security Considerations
//!
//! - **Trusted Dealer**: key generation sees the master secret.
//! - **Secret Shares**: a [`Node`] is the only owner of its share; it cannot be
//!   cloned and clears the share on drop.
//! - **Defense in Depth**: a bug in one pairing library surfaces as
//!   [`Error::BackendMismatch`] instead of a wrong verdict.

pub mod backend;
pub mod config;
pub mod errors;
pub mod lagrange;
pub mod protocol;
pub mod verifier;

mod poly;
mod rng;
mod serde_impl;

pub use backend::{ArkworksBls12, BlstBackend, PairingBackend};
pub use config::{BackendId, CIPHERSUITE_DST, SchemeParameters};
pub use errors::{BackendError, Error};
pub use protocol::{
    GroupSignature, Node, PartialSignature, PublicKey, SignatureScheme, ThresholdBls,
    ThresholdScheme,
};
pub use verifier::{VerificationResult, Verifier};
