//! blst-backed concrete implementation for BLS12-381 operations.
//!
//! This module provides the concrete types and implementations for the
//! `BlstBackend`. It implements the `FieldElement`, `CurvePoint`,
//! `TargetGroup` and `PairingBackend` traits defined in `crate::backend`
//! using the `blstrs` crate.
//!
//! Exported types include:
//! - `BlstG1`, `BlstG2`, `BlstGt` - wrapped group/target types
//! - `BlstBackend` - top-level backend type
//!
//! # Example
//!
//! ```rust
//! use tbls::backend::{BlstBackend, PairingBackend};
//! use tbls::CIPHERSUITE_DST;
//!
//! let h = BlstBackend::hash_to_g2(b"hello", CIPHERSUITE_DST).expect("hash");
//! let bytes = BlstBackend::encode_g2(&h);
//! assert_eq!(BlstBackend::decode_g2(&bytes).expect("decode"), h);
//! ```

use blstrs::{Bls12, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective, Gt, Scalar};
use ff::Field;
use group::{Curve, Group, prime::PrimeCurveAffine};
use pairing::{MillerLoopResult as PairingMillerLoopResult, MultiMillerLoop};
use rand_core::RngCore;

use super::{G1_ENCODED_LEN, G2_ENCODED_LEN, SCALAR_LEN, split_limbs};
use crate::backend::{CurvePoint, FieldElement, PairingBackend, TargetGroup};
use crate::config::BackendId;
use crate::errors::BackendError;

impl FieldElement for Scalar {
    fn zero() -> Self {
        Scalar::ZERO
    }

    fn one() -> Self {
        Scalar::ONE
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        <Scalar as Field>::random(rng)
    }

    fn invert(&self) -> Option<Self> {
        Field::invert(self).into()
    }

    fn from_u64(n: u64) -> Self {
        Scalar::from(n)
    }

    fn to_bytes_be(&self) -> [u8; SCALAR_LEN] {
        Scalar::to_bytes_be(self)
    }
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct BlstG1(pub G1Projective);

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct BlstG2(pub G2Projective);

#[derive(Clone, Debug)]
pub struct BlstGt(pub Gt);

impl CurvePoint<Scalar> for BlstG1 {
    fn identity() -> Self {
        BlstG1(G1Projective::identity())
    }

    fn generator() -> Self {
        BlstG1(G1Projective::generator())
    }

    fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    fn add(&self, other: &Self) -> Self {
        BlstG1(self.0 + other.0)
    }

    fn negate(&self) -> Self {
        BlstG1(-self.0)
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        BlstG1(self.0 * scalar)
    }
}

impl CurvePoint<Scalar> for BlstG2 {
    fn identity() -> Self {
        BlstG2(G2Projective::identity())
    }

    fn generator() -> Self {
        BlstG2(G2Projective::generator())
    }

    fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    fn add(&self, other: &Self) -> Self {
        BlstG2(self.0 + other.0)
    }

    fn negate(&self) -> Self {
        BlstG2(-self.0)
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        BlstG2(self.0 * scalar)
    }
}

impl TargetGroup for BlstGt {
    fn identity() -> Self {
        BlstGt(Gt::identity())
    }

    fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BlstBackend;

/// blst-backed `PairingBackend` implementation for BLS12-381.
///
/// The uncompressed serialization of `blstrs` already uses the byte layout of
/// the shared encoding, so encode and decode only add the all-zero identity
/// convention and explicit validation.
impl PairingBackend for BlstBackend {
    const ID: BackendId = BackendId::Blst;

    type Scalar = Scalar;
    type G1 = BlstG1;
    type G2 = BlstG2;
    type Target = BlstGt;

    fn hash_to_g2(message: &[u8], dst: &[u8]) -> Result<Self::G2, BackendError> {
        Ok(BlstG2(G2Projective::hash_to_curve(message, dst, &[])))
    }

    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let lhs_proj: Vec<G1Projective> = g1.iter().map(|p| p.0).collect();
        let rhs_proj: Vec<G2Projective> = g2.iter().map(|p| p.0).collect();
        let mut g1_affine = vec![G1Affine::identity(); lhs_proj.len()];
        let mut g2_affine = vec![G2Affine::identity(); rhs_proj.len()];
        G1Projective::batch_normalize(&lhs_proj, &mut g1_affine);
        G2Projective::batch_normalize(&rhs_proj, &mut g2_affine);
        let g2_prepared: Vec<G2Prepared> =
            g2_affine.iter().map(|aff| G2Prepared::from(*aff)).collect();
        let terms: Vec<_> = g1_affine.iter().zip(g2_prepared.iter()).collect();
        let result = Bls12::multi_miller_loop(&terms).final_exponentiation();
        Ok(BlstGt(result))
    }

    fn encode_g1(point: &Self::G1) -> [u8; G1_ENCODED_LEN] {
        if point.is_identity() {
            return [0u8; G1_ENCODED_LEN];
        }
        point.0.to_affine().to_uncompressed()
    }

    fn encode_g2(point: &Self::G2) -> [u8; G2_ENCODED_LEN] {
        if point.is_identity() {
            return [0u8; G2_ENCODED_LEN];
        }
        point.0.to_affine().to_uncompressed()
    }

    fn decode_g1(bytes: &[u8]) -> Result<Self::G1, BackendError> {
        if split_limbs::<2>(bytes)?.is_none() {
            return Ok(BlstG1::identity());
        }

        let mut raw = [0u8; G1_ENCODED_LEN];
        raw.copy_from_slice(bytes);
        // Canonical limbs carry no flag bits, so blst only refuses points
        // that fail the curve equation here.
        let affine = Option::<G1Affine>::from(G1Affine::from_uncompressed_unchecked(&raw))
            .ok_or(BackendError::NotOnCurve("g1 point"))?;
        if !bool::from(affine.is_on_curve()) {
            return Err(BackendError::NotOnCurve("g1 point"));
        }
        if !bool::from(affine.is_torsion_free()) {
            return Err(BackendError::NotInSubgroup("g1 point"));
        }
        Ok(BlstG1(affine.into()))
    }

    fn decode_g2(bytes: &[u8]) -> Result<Self::G2, BackendError> {
        if split_limbs::<4>(bytes)?.is_none() {
            return Ok(BlstG2::identity());
        }

        let mut raw = [0u8; G2_ENCODED_LEN];
        raw.copy_from_slice(bytes);
        // Canonical limbs carry no flag bits, so blst only refuses points
        // that fail the curve equation here.
        let affine = Option::<G2Affine>::from(G2Affine::from_uncompressed_unchecked(&raw))
            .ok_or(BackendError::NotOnCurve("g2 point"))?;
        if !bool::from(affine.is_on_curve()) {
            return Err(BackendError::NotOnCurve("g2 point"));
        }
        if !bool::from(affine.is_torsion_free()) {
            return Err(BackendError::NotInSubgroup("g2 point"));
        }
        Ok(BlstG2(affine.into()))
    }
}
