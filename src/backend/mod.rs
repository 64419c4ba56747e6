//! Backend trait abstractions for pairing-based operations.
//!
//! This module defines the trait hierarchy that lets the threshold scheme run
//! on more than one BLS12-381 implementation, and lets the verifier evaluate
//! the pairing equation on two of them side by side.
//!
//! # Architecture
//!
//! - **[`FieldElement`]**: Scalar field operations (zero, one, random, invert, ...)
//! - **[`CurvePoint`]**: Elliptic curve point operations for G1/G2 groups
//! - **[`TargetGroup`]**: Pairing output group (GT)
//! - **[`PairingBackend`]**: Umbrella trait adding hash-to-curve, the fixed-width
//!   point encoding and the multi-pairing product check
//!
//! # Available Backends
//!
//! - **[`BlstBackend`]**: BLS12-381 via blstrs
//! - **[`ArkworksBls12`]**: BLS12-381 via arkworks
//!
//! # Encoding
//!
//! Both backends share one bit-exact encoding so points can cross between
//! them:
//!
//! | Group | Bytes | Layout |
//! |-------|-------|--------|
//! | G1    | 96    | `X ‖ Y` |
//! | G2    | 192   | `X.c1 ‖ X.c0 ‖ Y.c1 ‖ Y.c0` |
//!
//! Every limb is a 48-byte big-endian integer in `[0, p)`. The identity is
//! encoded as all-zero bytes.
//!
//! # Example
//!
//! ```rust
//! use tbls::backend::{BlstBackend, CurvePoint, FieldElement, PairingBackend};
//! use rand::thread_rng;
//!
//! type Scalar = <BlstBackend as PairingBackend>::Scalar;
//! type G1 = <BlstBackend as PairingBackend>::G1;
//! type G2 = <BlstBackend as PairingBackend>::G2;
//!
//! let mut rng = thread_rng();
//! let a = Scalar::random(&mut rng);
//!
//! // e(a·G1, G2) · e(-G1, a·G2) == 1
//! let lhs = [G1::generator().mul_scalar(&a), G1::generator().negate()];
//! let rhs = [G2::generator(), G2::generator().mul_scalar(&a)];
//! assert!(BlstBackend::pairing_check(&lhs, &rhs).expect("pairing"));
//! ```

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use rand_core::RngCore;

use crate::config::BackendId;
use crate::errors::BackendError;

mod ark_bls12_381;
mod blst_bls12_381;

pub use ark_bls12_381::*;
pub use blst_bls12_381::*;

/// Length of one big-endian base field element in the point encoding.
pub const FIELD_ELEMENT_LEN: usize = 48;
/// Length of an encoded G1 point.
pub const G1_ENCODED_LEN: usize = 2 * FIELD_ELEMENT_LEN;
/// Length of an encoded G2 point.
pub const G2_ENCODED_LEN: usize = 4 * FIELD_ELEMENT_LEN;
/// Length of an encoded scalar.
pub const SCALAR_LEN: usize = 32;

/// Field element abstraction for scalar field operations.
///
/// This trait abstracts over the scalar field Fr of BLS12-381. Arithmetic goes
/// through the standard operator traits so polynomial and Lagrange code reads
/// like the math.
pub trait FieldElement:
    Copy
    + Send
    + Sync
    + Debug
    + PartialEq
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Returns the additive identity (zero) element.
    fn zero() -> Self;

    /// Returns the multiplicative identity (one) element.
    fn one() -> Self;

    /// Generates a uniformly random field element using the provided RNG.
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    /// Computes the multiplicative inverse, returning `None` for zero.
    fn invert(&self) -> Option<Self>;

    /// Converts a small integer into the field.
    fn from_u64(n: u64) -> Self;

    /// Serializes this element as a 32-byte big-endian integer.
    fn to_bytes_be(&self) -> [u8; SCALAR_LEN];
}

/// Elliptic curve point abstraction for G1 and G2 groups.
pub trait CurvePoint<F: FieldElement>: Copy + Send + Sync + Debug + PartialEq + 'static {
    /// Returns the point at infinity (identity element).
    fn identity() -> Self;

    /// Returns the standard generator for this group.
    fn generator() -> Self;

    /// Checks if this point is the identity element.
    fn is_identity(&self) -> bool;

    /// Performs elliptic curve point addition.
    fn add(&self, other: &Self) -> Self;

    /// Returns the additive inverse of this point.
    fn negate(&self) -> Self;

    /// Performs scalar multiplication: returns `scalar * self`.
    fn mul_scalar(&self, scalar: &F) -> Self;
}

/// Pairing target group (GT) abstraction.
pub trait TargetGroup: Clone + Send + Sync + Debug + 'static {
    /// Returns the multiplicative identity element.
    fn identity() -> Self;

    /// Checks if this element is the identity.
    fn is_identity(&self) -> bool;
}

/// Main backend trait that ties together all pairing-based operations.
///
/// This is the capability the threshold layer asks of a curve library. Two
/// independent implementations exist so the verifier can require them to
/// agree.
pub trait PairingBackend: Send + Sync + Debug + Sized + 'static {
    /// Which implementation this is.
    const ID: BackendId;

    /// Scalar field type (Fr).
    type Scalar: FieldElement;
    /// First curve group (G1), home of public keys.
    type G1: CurvePoint<Self::Scalar>;
    /// Second curve group (G2), home of signatures.
    type G2: CurvePoint<Self::Scalar>;
    /// Pairing target group (GT).
    type Target: TargetGroup;

    /// Hashes `message` to G2 under the domain separation tag `dst`.
    ///
    /// Implements `hash_to_curve` (random oracle variant) with
    /// expand_message_xmd over SHA-256 and the simplified SWU map.
    fn hash_to_g2(message: &[u8], dst: &[u8]) -> Result<Self::G2, BackendError>;

    /// Computes a product of pairings: `∏ e(g1[i], g2[i])`.
    ///
    /// Returns an error if the input slices have different lengths.
    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError>;

    /// Returns whether `∏ e(g1[i], g2[i])` is the identity of GT.
    fn pairing_check(g1: &[Self::G1], g2: &[Self::G2]) -> Result<bool, BackendError> {
        Ok(Self::multi_pairing(g1, g2)?.is_identity())
    }

    /// Encodes a G1 point as `X ‖ Y`.
    fn encode_g1(point: &Self::G1) -> [u8; G1_ENCODED_LEN];

    /// Encodes a G2 point as `X.c1 ‖ X.c0 ‖ Y.c1 ‖ Y.c0`.
    fn encode_g2(point: &Self::G2) -> [u8; G2_ENCODED_LEN];

    /// Decodes and validates a G1 point.
    ///
    /// Fails with `Serialization`/`InvalidLength` for malformed bytes and with
    /// `NotOnCurve`/`NotInSubgroup` when the coordinates do not describe a
    /// point of the prime-order group.
    fn decode_g1(bytes: &[u8]) -> Result<Self::G1, BackendError>;

    /// Decodes and validates a G2 point. Same failure modes as [`Self::decode_g1`].
    fn decode_g2(bytes: &[u8]) -> Result<Self::G2, BackendError>;
}

/// Big-endian BLS12-381 base field modulus `p`.
pub(crate) const BLS12_381_MODULUS: [u8; FIELD_ELEMENT_LEN] = [
    0x1a, 0x01, 0x11, 0xea, 0x39, 0x7f, 0xe6, 0x9a, 0x4b, 0x1b, 0xa7, 0xb6, 0x43, 0x4b, 0xac, 0xd7,
    0x64, 0x77, 0x4b, 0x84, 0xf3, 0x85, 0x12, 0xbf, 0x67, 0x30, 0xd2, 0xa0, 0xf6, 0xb0, 0xf6, 0x24,
    0x1e, 0xab, 0xff, 0xfe, 0xb1, 0x53, 0xff, 0xff, 0xb9, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xaa, 0xab,
];

/// Splits a fixed-width point encoding into its 48-byte limbs.
///
/// Returns `None` for the all-zero encoding of the identity. Every other
/// limb must be a canonical field element, i.e. strictly below the modulus.
fn split_limbs<const N: usize>(
    bytes: &[u8],
) -> Result<Option<[[u8; FIELD_ELEMENT_LEN]; N]>, BackendError> {
    let expected = N * FIELD_ELEMENT_LEN;
    if bytes.len() != expected {
        return Err(BackendError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.iter().all(|b| *b == 0) {
        return Ok(None);
    }
    let mut limbs = [[0u8; FIELD_ELEMENT_LEN]; N];
    for (limb, chunk) in limbs
        .iter_mut()
        .zip(bytes.chunks_exact(FIELD_ELEMENT_LEN))
    {
        // Big-endian byte arrays order the same way as the integers they hold.
        if chunk >= &BLS12_381_MODULUS[..] {
            return Err(BackendError::Serialization("non-canonical field element"));
        }
        limb.copy_from_slice(chunk);
    }
    Ok(Some(limbs))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::config::CIPHERSUITE_DST;

    fn bilinearity_helper<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = B::Scalar::random(&mut rng);
        let b = B::Scalar::random(&mut rng);
        let p = B::G1::generator().mul_scalar(&a);
        let q = B::G2::generator().mul_scalar(&b);
        // e(aP, bQ) · e(-abP, Q) == 1
        let ab_p = B::G1::generator().mul_scalar(&(a * b)).negate();
        assert!(B::pairing_check(&[p, ab_p], &[q, B::G2::generator()]).expect("pairing"));
        assert!(!B::pairing_check(&[p], &[q]).expect("pairing"));
    }

    fn length_mismatch_helper<B: PairingBackend>() {
        let err = B::multi_pairing(&[B::G1::generator()], &[]);
        assert!(matches!(err, Err(BackendError::Math(_))));
    }

    fn empty_product_helper<B: PairingBackend>() {
        assert!(B::pairing_check(&[], &[]).expect("empty product"));
    }

    fn encoding_roundtrip_helper<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..8 {
            let s = B::Scalar::random(&mut rng);
            let p = B::G1::generator().mul_scalar(&s);
            let q = B::G2::generator().mul_scalar(&s);
            assert_eq!(B::decode_g1(&B::encode_g1(&p)).expect("g1"), p);
            assert_eq!(B::decode_g2(&B::encode_g2(&q)).expect("g2"), q);
        }
        let id1 = B::G1::identity();
        let id2 = B::G2::identity();
        assert_eq!(B::encode_g1(&id1), [0u8; G1_ENCODED_LEN]);
        assert_eq!(B::encode_g2(&id2), [0u8; G2_ENCODED_LEN]);
        assert!(B::decode_g1(&[0u8; G1_ENCODED_LEN]).expect("g1").is_identity());
        assert!(B::decode_g2(&[0u8; G2_ENCODED_LEN]).expect("g2").is_identity());
    }

    fn rejects_malformed_helper<B: PairingBackend>() {
        let p = B::encode_g1(&B::G1::generator());
        assert!(matches!(
            B::decode_g1(&p[..G1_ENCODED_LEN - 1]),
            Err(BackendError::InvalidLength { .. })
        ));

        // X = p (the modulus) is not a canonical field element.
        let mut bad = p;
        bad[..FIELD_ELEMENT_LEN].copy_from_slice(&BLS12_381_MODULUS);
        assert!(matches!(
            B::decode_g1(&bad),
            Err(BackendError::Serialization(_))
        ));

        // Y + 1 breaks the curve equation.
        let mut off_curve = p;
        off_curve[G1_ENCODED_LEN - 1] ^= 0x01;
        assert!(matches!(
            B::decode_g1(&off_curve),
            Err(BackendError::NotOnCurve(_))
        ));

        // (0, 2) satisfies y^2 = x^3 + 4 but has order 3.
        let mut torsion = [0u8; G1_ENCODED_LEN];
        torsion[G1_ENCODED_LEN - 1] = 2;
        assert!(matches!(
            B::decode_g1(&torsion),
            Err(BackendError::NotInSubgroup(_))
        ));

        let q = B::encode_g2(&B::G2::generator());
        let mut off_curve = q;
        off_curve[G2_ENCODED_LEN - 1] ^= 0x01;
        assert!(matches!(
            B::decode_g2(&off_curve),
            Err(BackendError::NotOnCurve(_))
        ));
    }

    fn hash_determinism_helper<B: PairingBackend>() {
        let h1 = B::hash_to_g2(b"hello", CIPHERSUITE_DST).expect("hash");
        let h2 = B::hash_to_g2(b"hello", CIPHERSUITE_DST).expect("hash");
        let h3 = B::hash_to_g2(b"hallo", CIPHERSUITE_DST).expect("hash");
        let empty = B::hash_to_g2(b"", CIPHERSUITE_DST).expect("hash");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert!(!empty.is_identity());
    }

    #[test]
    fn bilinearity() {
        bilinearity_helper::<BlstBackend>();
        bilinearity_helper::<ArkworksBls12>();
    }

    #[test]
    fn multi_pairing_length_mismatch() {
        length_mismatch_helper::<BlstBackend>();
        length_mismatch_helper::<ArkworksBls12>();
    }

    #[test]
    fn empty_pairing_product_is_identity() {
        empty_product_helper::<BlstBackend>();
        empty_product_helper::<ArkworksBls12>();
    }

    #[test]
    fn encoding_roundtrip() {
        encoding_roundtrip_helper::<BlstBackend>();
        encoding_roundtrip_helper::<ArkworksBls12>();
    }

    #[test]
    fn rejects_malformed_encodings() {
        rejects_malformed_helper::<BlstBackend>();
        rejects_malformed_helper::<ArkworksBls12>();
    }

    #[test]
    fn hash_to_g2_is_deterministic() {
        hash_determinism_helper::<BlstBackend>();
        hash_determinism_helper::<ArkworksBls12>();
    }

    #[test]
    fn backends_agree_on_hash_to_g2() {
        for msg in [&b""[..], &b"hello"[..], &b"hallo"[..], &[0xffu8; 300][..]] {
            let blst = BlstBackend::hash_to_g2(msg, CIPHERSUITE_DST).expect("blst hash");
            let ark = ArkworksBls12::hash_to_g2(msg, CIPHERSUITE_DST).expect("ark hash");
            assert_eq!(
                BlstBackend::encode_g2(&blst),
                ArkworksBls12::encode_g2(&ark),
                "hash_to_g2 mismatch for {:?}",
                msg
            );
        }
    }

    #[test]
    fn backends_agree_on_encodings() {
        let mut rng = StdRng::seed_from_u64(3);
        for i in 1..=5u64 {
            let blst_s = <BlstBackend as PairingBackend>::Scalar::from_u64(i * 1_000_003);
            let ark_s = <ArkworksBls12 as PairingBackend>::Scalar::from_u64(i * 1_000_003);
            assert_eq!(blst_s.to_bytes_be(), ark_s.to_bytes_be());

            let blst_g1 = BlstG1::generator().mul_scalar(&blst_s);
            let ark_g1 = ArkG1::generator().mul_scalar(&ark_s);
            assert_eq!(
                BlstBackend::encode_g1(&blst_g1),
                ArkworksBls12::encode_g1(&ark_g1)
            );

            let blst_g2 = BlstG2::generator().mul_scalar(&blst_s);
            let ark_g2 = ArkG2::generator().mul_scalar(&ark_s);
            assert_eq!(
                BlstBackend::encode_g2(&blst_g2),
                ArkworksBls12::encode_g2(&ark_g2)
            );
        }

        // A random blst point re-encoded through arkworks is byte-identical.
        let s = <BlstBackend as PairingBackend>::Scalar::random(&mut rng);
        let sig = BlstG2::generator().mul_scalar(&s);
        let bytes = BlstBackend::encode_g2(&sig);
        let ark = ArkworksBls12::decode_g2(&bytes).expect("decode");
        assert_eq!(ArkworksBls12::encode_g2(&ark), bytes);
    }

    #[test]
    fn split_limbs_layout() {
        let mut bytes = [0u8; G1_ENCODED_LEN];
        bytes[0] = 1;
        bytes[FIELD_ELEMENT_LEN] = 2;
        let limbs = split_limbs::<2>(&bytes).expect("split").expect("non-zero");
        assert_eq!(limbs[0][0], 1);
        assert_eq!(limbs[1][0], 2);
        assert!(split_limbs::<2>(&[0u8; G1_ENCODED_LEN]).expect("split").is_none());
    }

    #[test]
    fn split_limbs_rejects_non_canonical_limbs() {
        let mut below = BLS12_381_MODULUS;
        below[FIELD_ELEMENT_LEN - 1] -= 1;

        let mut bytes = [0u8; G2_ENCODED_LEN];
        bytes[..FIELD_ELEMENT_LEN].copy_from_slice(&below);
        assert!(split_limbs::<4>(&bytes).expect("p - 1 is canonical").is_some());

        for limb in 0..4 {
            let mut bytes = [0u8; G2_ENCODED_LEN];
            let range = limb * FIELD_ELEMENT_LEN..(limb + 1) * FIELD_ELEMENT_LEN;
            bytes[range.clone()].copy_from_slice(&BLS12_381_MODULUS);
            assert!(matches!(
                split_limbs::<4>(&bytes),
                Err(BackendError::Serialization(_))
            ));
            bytes[range].fill(0xff);
            assert!(matches!(
                split_limbs::<4>(&bytes),
                Err(BackendError::Serialization(_))
            ));
        }
    }
}
