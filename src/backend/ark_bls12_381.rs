//! Arkworks-backed concrete implementation for BLS12-381 operations.
//!
//! This module provides the concrete types and implementations for the
//! `ArkworksBls12` backend. It implements the `FieldElement`, `CurvePoint`,
//! `TargetGroup` and `PairingBackend` traits from `crate::backend` using the
//! `arkworks` crates.
//!
//! Arkworks' own canonical serialization is little-endian and compressed by
//! default, so this backend converts to and from the shared big-endian
//! uncompressed layout by hand.
//!
//! Exported types include: `ArkworksBls12`, `ArkG1`, `ArkG2`, `ArkGt`.

use ark_bls12_381::{
    Bls12_381, Fq, Fq2, Fr as BlsFr, G1Affine as RawG1Affine, G1Projective as RawG1,
    G2Affine as RawG2Affine, G2Projective as RawG2, g2,
};
use ark_ec::{
    AffineRepr, CurveGroup, PrimeGroup,
    hashing::{
        HashToCurve, curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher,
    },
    pairing::{Pairing, PairingOutput},
};
use ark_ff::{BigInt, BigInteger, Field, One, PrimeField, Zero, field_hashers::DefaultFieldHasher};
use rand_core::RngCore;
use sha2::Sha256;

use super::{FIELD_ELEMENT_LEN, G1_ENCODED_LEN, G2_ENCODED_LEN, SCALAR_LEN, split_limbs};
use crate::backend::{CurvePoint, FieldElement, PairingBackend, TargetGroup};
use crate::config::BackendId;
use crate::errors::BackendError;

type G2Hasher = MapToCurveBasedHasher<RawG2, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

/// Samples a scalar by reducing 64 random bytes, which keeps the modular bias
/// negligible.
fn sample_field<F: PrimeField, R: RngCore + ?Sized>(rng: &mut R) -> F {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    F::from_le_bytes_mod_order(&bytes)
}

impl FieldElement for BlsFr {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        sample_field(rng)
    }

    fn invert(&self) -> Option<Self> {
        self.inverse()
    }

    fn from_u64(n: u64) -> Self {
        BlsFr::from(n)
    }

    fn to_bytes_be(&self) -> [u8; SCALAR_LEN] {
        let mut out = [0u8; SCALAR_LEN];
        out.copy_from_slice(&self.into_bigint().to_bytes_be());
        out
    }
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct ArkG1(pub RawG1);

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct ArkG2(pub RawG2);

#[derive(Clone, Debug)]
pub struct ArkGt(pub PairingOutput<Bls12_381>);

impl CurvePoint<BlsFr> for ArkG1 {
    fn identity() -> Self {
        ArkG1(RawG1::zero())
    }

    fn generator() -> Self {
        ArkG1(RawG1::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp += other.0;
        ArkG1(tmp)
    }

    fn negate(&self) -> Self {
        ArkG1(-self.0)
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        ArkG1(self.0.mul_bigint(scalar.into_bigint()))
    }
}

impl CurvePoint<BlsFr> for ArkG2 {
    fn identity() -> Self {
        ArkG2(RawG2::zero())
    }

    fn generator() -> Self {
        ArkG2(RawG2::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp += other.0;
        ArkG2(tmp)
    }

    fn negate(&self) -> Self {
        ArkG2(-self.0)
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        ArkG2(self.0.mul_bigint(scalar.into_bigint()))
    }
}

impl TargetGroup for ArkGt {
    fn identity() -> Self {
        ArkGt(PairingOutput::<Bls12_381>::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }
}

/// Parses a 48-byte big-endian limb, rejecting values `>= p`.
fn fq_from_be(limb: &[u8; FIELD_ELEMENT_LEN]) -> Result<Fq, BackendError> {
    let mut words = [0u64; 6];
    for (i, word) in words.iter_mut().enumerate() {
        let end = FIELD_ELEMENT_LEN - 8 * i;
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&limb[end - 8..end]);
        *word = u64::from_be_bytes(chunk);
    }
    Fq::from_bigint(BigInt::new(words))
        .ok_or(BackendError::Serialization("non-canonical field element"))
}

fn fq_to_be(value: &Fq, out: &mut [u8]) {
    out.copy_from_slice(&value.into_bigint().to_bytes_be());
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ArkworksBls12;

impl PairingBackend for ArkworksBls12 {
    const ID: BackendId = BackendId::Arkworks;

    type Scalar = BlsFr;
    type G1 = ArkG1;
    type G2 = ArkG2;
    type Target = ArkGt;

    fn hash_to_g2(message: &[u8], dst: &[u8]) -> Result<Self::G2, BackendError> {
        let hasher = <G2Hasher as HashToCurve<RawG2>>::new(dst)
            .map_err(|e| BackendError::HashToCurve(e.to_string()))?;
        let point = hasher
            .hash(message)
            .map_err(|e| BackendError::HashToCurve(e.to_string()))?;
        Ok(ArkG2(point.into_group()))
    }

    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let lhs_proj: Vec<RawG1> = g1.iter().map(|p| p.0).collect();
        let rhs_proj: Vec<RawG2> = g2.iter().map(|p| p.0).collect();
        let lhs = RawG1::normalize_batch(&lhs_proj);
        let rhs = RawG2::normalize_batch(&rhs_proj);
        Ok(ArkGt(Bls12_381::multi_pairing(lhs, rhs)))
    }

    fn encode_g1(point: &Self::G1) -> [u8; G1_ENCODED_LEN] {
        let mut out = [0u8; G1_ENCODED_LEN];
        let affine = point.0.into_affine();
        if affine.infinity {
            return out;
        }
        let (x, y) = out.split_at_mut(FIELD_ELEMENT_LEN);
        fq_to_be(&affine.x, x);
        fq_to_be(&affine.y, y);
        out
    }

    fn encode_g2(point: &Self::G2) -> [u8; G2_ENCODED_LEN] {
        let mut out = [0u8; G2_ENCODED_LEN];
        let affine = point.0.into_affine();
        if affine.infinity {
            return out;
        }
        let limbs = [affine.x.c1, affine.x.c0, affine.y.c1, affine.y.c0];
        for (limb, chunk) in limbs.iter().zip(out.chunks_exact_mut(FIELD_ELEMENT_LEN)) {
            fq_to_be(limb, chunk);
        }
        out
    }

    fn decode_g1(bytes: &[u8]) -> Result<Self::G1, BackendError> {
        let Some([x, y]) = split_limbs::<2>(bytes)? else {
            return Ok(ArkG1::identity());
        };
        let affine = RawG1Affine::new_unchecked(fq_from_be(&x)?, fq_from_be(&y)?);
        if !affine.is_on_curve() {
            return Err(BackendError::NotOnCurve("g1 point"));
        }
        if !affine.is_in_correct_subgroup_assuming_on_curve() {
            return Err(BackendError::NotInSubgroup("g1 point"));
        }
        Ok(ArkG1(affine.into_group()))
    }

    fn decode_g2(bytes: &[u8]) -> Result<Self::G2, BackendError> {
        let Some([x_c1, x_c0, y_c1, y_c0]) = split_limbs::<4>(bytes)? else {
            return Ok(ArkG2::identity());
        };
        let x = Fq2::new(fq_from_be(&x_c0)?, fq_from_be(&x_c1)?);
        let y = Fq2::new(fq_from_be(&y_c0)?, fq_from_be(&y_c1)?);
        let affine = RawG2Affine::new_unchecked(x, y);
        if !affine.is_on_curve() {
            return Err(BackendError::NotOnCurve("g2 point"));
        }
        if !affine.is_in_correct_subgroup_assuming_on_curve() {
            return Err(BackendError::NotInSubgroup("g2 point"));
        }
        Ok(ArkG2(affine.into_group()))
    }
}
