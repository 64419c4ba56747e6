//! Threshold BLS signature protocol implementation.
//!
//! This module implements a `(t, n)` threshold BLS scheme over BLS12-381 with a
//! trusted dealer. A master secret is split with Shamir sharing so that any `t`
//! of the `n` nodes jointly produce the signature the master key would have
//! produced, while `t - 1` nodes learn nothing about it.
//!
//! # Protocol Overview
//!
//! 1. **Initialization** ([`ThresholdScheme::initialize`]): Sample a random
//!    polynomial `f` of degree `t - 1`, hand node `i` the share `f(i)` and
//!    publish `f(i)·G1` and the group key `f(0)·G1`.
//!
//! 2. **Partial Signing** ([`ThresholdScheme::partial_sign`]): Node `i` returns
//!    `f(i)·H(m)` where `H` hashes to G2.
//!
//! 3. **Recovery** ([`ThresholdScheme::recover`]): Any `t` partial signatures
//!    combine with Lagrange coefficients at zero into `f(0)·H(m)`.
//!
//! 4. **Verification** ([`Verifier`](crate::Verifier)): Checks
//!    `e(G1, σ) · e(pk, -H(m)) == 1` on two independent backends.
//!
//! # Example
//!
//! ```rust
//! use tbls::backend::BlstBackend;
//! use tbls::protocol::{ThresholdBls, ThresholdScheme};
//! use tbls::Verifier;
//! use rand::thread_rng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = thread_rng();
//! let scheme = ThresholdBls::<BlstBackend>::default();
//!
//! // 3-of-5 threshold
//! let keys = scheme.initialize(&mut rng, 3, 5)?;
//!
//! // Nodes 1, 3 and 5 sign together
//! let signature = scheme.sign(&keys, b"hello", &[1, 3, 5])?;
//!
//! let result = Verifier::default().verify(b"hello", &signature, keys.group_public_key())?;
//! assert!(result.is_valid);
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! - **Trusted Dealer**: `initialize` sees the master secret. Distributed key
//!   generation is out of scope.
//! - **Secret Lifetime**: The polynomial is wiped before `initialize` returns;
//!   each secret share lives only in its [`Node`].

use core::{fmt::Debug, marker::PhantomData};
use std::collections::HashSet;

use rand_core::{CryptoRng, RngCore};
use rayon::iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument, trace};

use crate::{
    backend::{CurvePoint, FieldElement, PairingBackend},
    config::{CIPHERSUITE_DST, SchemeParameters},
    errors::Error,
    lagrange::interpolate_at_zero,
    poly::SecretPolynomial,
    rng::CheckedRng,
};

mod keys;

pub use keys::{GroupSignature, Node, PartialSignature, PublicKey, SignatureScheme};

/// Threshold signature scheme interface.
///
/// The trait is generic over the pairing backend so the same protocol code
/// runs on blstrs and arkworks.
pub trait ThresholdScheme<B: PairingBackend>: Debug + Send + Sync + 'static {
    /// Generates the master key and every node's share.
    ///
    /// # Arguments
    ///
    /// - `rng`: Cryptographically secure random number generator. A seeded
    ///   generator gives reproducible keys, which is only appropriate in tests.
    /// - `threshold`: Number of nodes required to sign (t).
    /// - `total_nodes`: Number of nodes holding a share (n).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameters`] unless `1 ≤ threshold ≤ total_nodes`.
    /// - [`Error::RandomnessFailure`] if the RNG reports an error. The call is
    ///   not retried.
    fn initialize<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        threshold: usize,
        total_nodes: usize,
    ) -> Result<SignatureScheme<B>, Error>;

    /// Signs `message` with one node's share.
    ///
    /// Pure: the same node and message always give the same partial signature.
    /// Empty messages are allowed.
    fn partial_sign(&self, node: &Node<B>, message: &[u8]) -> Result<PartialSignature<B>, Error>;

    /// Combines at least `threshold` partial signatures into the group signature.
    ///
    /// Extra partial signatures are accepted and their order does not matter.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`Error::InsufficientShares`] if fewer than `threshold` are given.
    /// - [`Error::IndexOutOfRange`] for an index outside `[1, total_nodes]`.
    /// - [`Error::DuplicateShare`] if an index appears twice.
    fn recover(
        &self,
        partials: &[PartialSignature<B>],
        params: &SchemeParameters,
    ) -> Result<GroupSignature<B>, Error>;

    /// Signs `message` with the nodes named by `indices` and recovers the
    /// group signature.
    ///
    /// Indices are validated the same way as in [`ThresholdScheme::recover`]
    /// before any signing happens.
    fn sign(
        &self,
        scheme: &SignatureScheme<B>,
        message: &[u8],
        indices: &[usize],
    ) -> Result<GroupSignature<B>, Error>;
}

/// Dealer-based threshold BLS over a single backend.
#[derive(Debug)]
pub struct ThresholdBls<B: PairingBackend>(PhantomData<B>);

impl<B: PairingBackend> Default for ThresholdBls<B> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<B: PairingBackend> ThresholdBls<B> {
    /// Same as [`Default::default`]; the scheme itself holds no state.
    pub fn new() -> Self {
        Self::default()
    }

    fn sign_hashed(node: &Node<B>, hashed: &B::G2) -> PartialSignature<B> {
        PartialSignature {
            index: node.index(),
            point: hashed.mul_scalar(node.secret_share()),
        }
    }
}

/// Validates a set of signer indices against the scheme parameters.
fn check_indices(
    params: &SchemeParameters,
    indices: impl Iterator<Item = usize> + Clone,
) -> Result<(), Error> {
    let provided = indices.clone().count();
    if provided < params.threshold {
        return Err(Error::InsufficientShares {
            required: params.threshold,
            provided,
        });
    }
    for index in indices.clone() {
        params.check_index(index)?;
    }
    let mut seen = HashSet::with_capacity(provided);
    for index in indices {
        if !seen.insert(index) {
            return Err(Error::DuplicateShare(index));
        }
    }
    Ok(())
}

impl<B: PairingBackend> ThresholdScheme<B> for ThresholdBls<B> {
    #[instrument(level = "info", skip(self, rng), fields(backend = %B::ID))]
    fn initialize<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        threshold: usize,
        total_nodes: usize,
    ) -> Result<SignatureScheme<B>, Error> {
        let params = SchemeParameters::new(threshold, total_nodes)?;

        let mut checked = CheckedRng::new(rng);
        let polynomial = SecretPolynomial::<B::Scalar>::random(threshold, &mut checked);
        checked.check()?;

        let nodes: Vec<Node<B>> = (1..=total_nodes)
            .into_par_iter()
            .map(|index| {
                let share = polynomial.evaluate(&B::Scalar::from_u64(index as u64));
                Node::new(index, share)
            })
            .collect();

        let group_public_key =
            PublicKey::from_point(B::G1::generator().mul_scalar(&polynomial.constant_term()));
        debug!(nodes = nodes.len(), "derived node shares");

        Ok(SignatureScheme::new(params, nodes, group_public_key))
    }

    #[instrument(
        level = "debug",
        skip(self, node, message),
        fields(index = node.index(), message_len = message.len())
    )]
    fn partial_sign(&self, node: &Node<B>, message: &[u8]) -> Result<PartialSignature<B>, Error> {
        let hashed = B::hash_to_g2(message, CIPHERSUITE_DST)?;
        Ok(Self::sign_hashed(node, &hashed))
    }

    #[instrument(
        level = "info",
        skip(self, partials, params),
        fields(num_partials = partials.len(), threshold = params.threshold)
    )]
    fn recover(
        &self,
        partials: &[PartialSignature<B>],
        params: &SchemeParameters,
    ) -> Result<GroupSignature<B>, Error> {
        params.validate()?;
        check_indices(params, partials.iter().map(|p| p.index))?;

        let points: Vec<(usize, B::G2)> = partials.iter().map(|p| (p.index, p.point)).collect();
        trace!(
            indices = ?points.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            "interpolating partial signatures"
        );
        let signature = interpolate_at_zero::<B::Scalar, B::G2>(&points)?;
        Ok(GroupSignature::from_point(signature))
    }

    #[instrument(
        level = "info",
        skip(self, scheme, message, indices),
        fields(signers = indices.len(), message_len = message.len())
    )]
    fn sign(
        &self,
        scheme: &SignatureScheme<B>,
        message: &[u8],
        indices: &[usize],
    ) -> Result<GroupSignature<B>, Error> {
        let params = scheme.params();
        check_indices(params, indices.iter().copied())?;

        let hashed = B::hash_to_g2(message, CIPHERSUITE_DST)?;
        let partials = indices
            .par_iter()
            .map(|&index| Ok(Self::sign_hashed(scheme.node(index)?, &hashed)))
            .collect::<Result<Vec<_>, Error>>()?;
        trace!(partials = partials.len(), "collected partial signatures");

        self.recover(&partials, params)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::backend::{ArkworksBls12, BlstBackend};
    use crate::rng::tests::FailingRng;

    fn run_subsets_agree<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(17);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 3, 5).expect("initialize");

        let a = scheme.sign(&keys, b"hello", &[1, 3, 5]).expect("sign");
        let b = scheme.sign(&keys, b"hello", &[2, 3, 4]).expect("sign");
        let c = scheme.sign(&keys, b"hello", &[5, 4, 3, 2, 1]).expect("sign");
        assert_eq!(a, b);
        assert_eq!(a, c);

        let other = scheme.sign(&keys, b"hallo", &[1, 3, 5]).expect("sign");
        assert_ne!(a, other);
    }

    fn run_matches_master_signature<B: PairingBackend>() {
        // Signing with the master secret directly gives the recovered signature.
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 2, 4).expect("initialize");

        let mut inner = ChaCha20Rng::seed_from_u64(3);
        let polynomial = SecretPolynomial::<B::Scalar>::random(2, &mut CheckedRng::new(&mut inner));
        let h = B::hash_to_g2(b"", CIPHERSUITE_DST).expect("hash");
        let expected = GroupSignature::<B>::from_point(h.mul_scalar(&polynomial.constant_term()));

        let recovered = scheme.sign(&keys, b"", &[4, 2]).expect("sign");
        assert_eq!(recovered, expected);
        assert_eq!(
            *keys.group_public_key().point(),
            B::G1::generator().mul_scalar(&polynomial.constant_term())
        );
    }

    fn run_group_key_paths_agree<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(23);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 3, 6).expect("initialize");

        for subset in [[1usize, 2, 3], [6, 4, 2], [1, 5, 6]] {
            let shares: Vec<(usize, B::G1)> = subset
                .iter()
                .map(|&i| {
                    let node = keys.node(i).expect("node");
                    (i, *node.public_share().point())
                })
                .collect();
            let interpolated =
                interpolate_at_zero::<B::Scalar, B::G1>(&shares).expect("interpolate");
            assert_eq!(interpolated, *keys.group_public_key().point());
        }

        // Re-deriving f(0) through the share path matches the direct product.
        let mut inner = StdRng::seed_from_u64(23);
        let polynomial = SecretPolynomial::<B::Scalar>::random(3, &mut CheckedRng::new(&mut inner));
        let via_share = Node::<B>::new(0, polynomial.evaluate(&B::Scalar::zero()));
        assert_eq!(via_share.public_share(), keys.group_public_key());
    }

    fn run_insufficient_shares<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(29);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 3, 5).expect("initialize");

        let result = scheme.sign(&keys, b"hello", &[1, 2]);
        assert!(
            matches!(
                result,
                Err(Error::InsufficientShares { required: 3, provided: 2 })
            ),
            "unexpected result: {:?}",
            result
        );

        // Count is checked before range.
        let result = scheme.sign(&keys, b"hello", &[0, 9]);
        assert!(matches!(result, Err(Error::InsufficientShares { .. })));
    }

    fn run_bad_indices<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(31);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 2, 3).expect("initialize");

        assert!(matches!(
            scheme.sign(&keys, b"m", &[1, 4]),
            Err(Error::IndexOutOfRange { index: 4, total_nodes: 3 })
        ));
        assert!(matches!(
            scheme.sign(&keys, b"m", &[0, 1]),
            Err(Error::IndexOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            scheme.sign(&keys, b"m", &[2, 2]),
            Err(Error::DuplicateShare(2))
        ));
        // Range is checked before duplicates.
        assert!(matches!(
            scheme.sign(&keys, b"m", &[2, 2, 7]),
            Err(Error::IndexOutOfRange { index: 7, .. })
        ));
    }

    fn run_recover_from_partials<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(37);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 3, 5).expect("initialize");

        let partials: Vec<PartialSignature<B>> = keys
            .nodes()
            .iter()
            .map(|node| scheme.partial_sign(node, b"hello").expect("partial"))
            .collect();

        let all = scheme.recover(&partials, keys.params()).expect("recover all");
        let mut reversed = partials[1..4].to_vec();
        reversed.reverse();
        let some = scheme.recover(&reversed, keys.params()).expect("recover subset");
        assert_eq!(all, some);
        assert_eq!(all, scheme.sign(&keys, b"hello", &[1, 2, 3]).expect("sign"));

        let mut duplicated = partials[..3].to_vec();
        duplicated[2] = partials[0].clone();
        assert!(matches!(
            scheme.recover(&duplicated, keys.params()),
            Err(Error::DuplicateShare(1))
        ));
        assert!(matches!(
            scheme.recover(&partials[..2], keys.params()),
            Err(Error::InsufficientShares { required: 3, provided: 2 })
        ));
    }

    fn run_partial_sign_is_deterministic<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(41);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 1, 2).expect("initialize");
        let node = keys.node(2).expect("node");
        let a = scheme.partial_sign(node, b"").expect("partial");
        let b = scheme.partial_sign(node, b"").expect("partial");
        assert_eq!(a, b);
        assert_eq!(a.index, 2);
    }

    fn run_invalid_parameters<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(43);
        let scheme = ThresholdBls::<B>::default();
        assert!(matches!(
            scheme.initialize(&mut rng, 4, 3),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            scheme.initialize(&mut rng, 0, 3),
            Err(Error::InvalidParameters(_))
        ));
    }

    fn run_randomness_failure<B: PairingBackend>() {
        let scheme = ThresholdBls::<B>::default();
        let result = scheme.initialize(&mut FailingRng, 2, 3);
        assert!(matches!(result, Err(Error::RandomnessFailure(_))));
    }

    fn run_threshold_one<B: PairingBackend>() {
        let mut rng = StdRng::seed_from_u64(47);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 1, 3).expect("initialize");
        let single = scheme.sign(&keys, b"solo", &[2]).expect("sign");
        let all = scheme.sign(&keys, b"solo", &[1, 2, 3]).expect("sign");
        assert_eq!(single, all);
    }

    fn run_recover_with_unbounded_total<B: PairingBackend>() {
        // Deserialized parameters may name far more nodes than were dealt.
        let mut rng = StdRng::seed_from_u64(59);
        let scheme = ThresholdBls::<B>::default();
        let keys = scheme.initialize(&mut rng, 2, 3).expect("initialize");
        let partial = scheme
            .partial_sign(keys.node(2).expect("node"), b"wide")
            .expect("partial");

        for total_nodes in [usize::MAX, 1 << 40] {
            let params = SchemeParameters {
                threshold: 1,
                total_nodes,
            };
            let recovered = scheme
                .recover(core::slice::from_ref(&partial), &params)
                .expect("recover");
            assert_eq!(recovered, GroupSignature::from_point(partial.point));

            assert!(matches!(
                scheme.recover(&[partial.clone(), partial.clone()], &params),
                Err(Error::DuplicateShare(2))
            ));

            let far = PartialSignature::<B> {
                index: total_nodes,
                point: partial.point,
            };
            let result = scheme.recover(&[partial.clone(), far.clone(), far], &params);
            assert!(matches!(result, Err(Error::DuplicateShare(i)) if i == total_nodes));
        }
    }

    fn run_deterministic_keys<B: PairingBackend>() {
        let scheme = ThresholdBls::<B>::default();
        let a = scheme
            .initialize(&mut StdRng::seed_from_u64(53), 2, 3)
            .expect("initialize");
        let b = scheme
            .initialize(&mut StdRng::seed_from_u64(53), 2, 3)
            .expect("initialize");
        assert_eq!(a.group_public_key(), b.group_public_key());
        assert_eq!(a.public_shares(), b.public_shares());
        let indices: Vec<usize> = a.into_nodes().iter().map(|n| n.index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn blst_subsets_agree() {
        run_subsets_agree::<BlstBackend>();
    }

    #[test]
    fn blst_matches_master_signature() {
        run_matches_master_signature::<BlstBackend>();
    }

    #[test]
    fn blst_group_key_paths_agree() {
        run_group_key_paths_agree::<BlstBackend>();
    }

    #[test]
    fn blst_insufficient_shares() {
        run_insufficient_shares::<BlstBackend>();
    }

    #[test]
    fn blst_bad_indices() {
        run_bad_indices::<BlstBackend>();
    }

    #[test]
    fn blst_recover_from_partials() {
        run_recover_from_partials::<BlstBackend>();
    }

    #[test]
    fn blst_partial_sign_is_deterministic() {
        run_partial_sign_is_deterministic::<BlstBackend>();
    }

    #[test]
    fn blst_invalid_parameters() {
        run_invalid_parameters::<BlstBackend>();
    }

    #[test]
    fn blst_randomness_failure() {
        run_randomness_failure::<BlstBackend>();
    }

    #[test]
    fn blst_threshold_one() {
        run_threshold_one::<BlstBackend>();
    }

    #[test]
    fn blst_deterministic_keys() {
        run_deterministic_keys::<BlstBackend>();
    }

    #[test]
    fn ark_bls_subsets_agree() {
        run_subsets_agree::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_matches_master_signature() {
        run_matches_master_signature::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_group_key_paths_agree() {
        run_group_key_paths_agree::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_insufficient_shares() {
        run_insufficient_shares::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_bad_indices() {
        run_bad_indices::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_recover_from_partials() {
        run_recover_from_partials::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_invalid_parameters() {
        run_invalid_parameters::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_randomness_failure() {
        run_randomness_failure::<ArkworksBls12>();
    }

    #[test]
    fn ark_bls_threshold_one() {
        run_threshold_one::<ArkworksBls12>();
    }

    #[test]
    fn blst_recover_with_unbounded_total() {
        run_recover_with_unbounded_total::<BlstBackend>();
    }

    #[test]
    fn ark_bls_recover_with_unbounded_total() {
        run_recover_with_unbounded_total::<ArkworksBls12>();
    }
}
