//! Key and signature material produced by the threshold scheme.
//!
//! Public artifacts ([`PublicKey`], [`GroupSignature`]) carry the fixed-width
//! encoding shared by every backend and print as lowercase hex. Secret shares
//! stay inside [`Node`], which cannot be cloned and wipes its share on drop.

use core::fmt;

use crate::{
    backend::{CurvePoint, FieldElement, G1_ENCODED_LEN, G2_ENCODED_LEN, PairingBackend, SCALAR_LEN},
    config::SchemeParameters,
    errors::Error,
    poly::clear_scalar,
};

/// A G1 public key.
///
/// Used both for the group public key `s0·G1` and for the per-node public
/// shares `f(i)·G1`.
pub struct PublicKey<B: PairingBackend> {
    point: B::G1,
}

impl<B: PairingBackend> PublicKey<B> {
    /// Wraps a backend point. Untrusted bytes go through [`Self::from_bytes`].
    pub fn from_point(point: B::G1) -> Self {
        Self { point }
    }

    /// The underlying backend point.
    pub fn point(&self) -> &B::G1 {
        &self.point
    }

    /// Encodes the key as 96 bytes: big-endian `X ‖ Y`.
    pub fn to_bytes(&self) -> [u8; G1_ENCODED_LEN] {
        B::encode_g1(&self.point)
    }

    /// Decodes and validates a key produced by any backend.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::from_point(B::decode_g1(bytes)?))
    }

    /// Lowercase hex of [`Self::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses hex and decodes the result with [`Self::from_bytes`].
    ///
    /// Malformed hex is a [`Error::DeserializationError`].
    ///
    /// ```rust
    /// use tbls::{BlstBackend, Error, PublicKey};
    /// use tbls::backend::{CurvePoint, PairingBackend};
    ///
    /// let g = PublicKey::<BlstBackend>::from_point(<BlstBackend as PairingBackend>::G1::generator());
    /// assert_eq!(PublicKey::<BlstBackend>::from_hex(&g.to_hex())?, g);
    /// assert!(matches!(
    ///     PublicKey::<BlstBackend>::from_hex("0x12"),
    ///     Err(Error::DeserializationError(_))
    /// ));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|e| Error::DeserializationError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl<B: PairingBackend> Clone for PublicKey<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: PairingBackend> Copy for PublicKey<B> {}

impl<B: PairingBackend> PartialEq for PublicKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl<B: PairingBackend> Eq for PublicKey<B> {}

impl<B: PairingBackend> fmt::Debug for PublicKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

impl<B: PairingBackend> fmt::Display for PublicKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A recovered group signature in G2.
///
/// Deterministic in the master secret and the message: every qualified subset
/// of nodes recovers the same value.
pub struct GroupSignature<B: PairingBackend> {
    point: B::G2,
}

impl<B: PairingBackend> GroupSignature<B> {
    /// Wraps a G2 point, e.g. one recovered by interpolation.
    pub fn from_point(point: B::G2) -> Self {
        Self { point }
    }

    /// The underlying backend point.
    pub fn point(&self) -> &B::G2 {
        &self.point
    }

    /// Encodes the signature as 192 bytes: `X.c1 ‖ X.c0 ‖ Y.c1 ‖ Y.c0`.
    pub fn to_bytes(&self) -> [u8; G2_ENCODED_LEN] {
        B::encode_g2(&self.point)
    }

    /// Decodes and validates a signature produced by any backend.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::from_point(B::decode_g2(bytes)?))
    }

    /// Lowercase hex of [`Self::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses hex and decodes the result with [`Self::from_bytes`].
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|e| Error::DeserializationError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl<B: PairingBackend> Clone for GroupSignature<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: PairingBackend> Copy for GroupSignature<B> {}

impl<B: PairingBackend> PartialEq for GroupSignature<B> {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl<B: PairingBackend> Eq for GroupSignature<B> {}

impl<B: PairingBackend> fmt::Debug for GroupSignature<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupSignature").field(&self.to_hex()).finish()
    }
}

impl<B: PairingBackend> fmt::Display for GroupSignature<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One node's signature share: `secret_share · H(message)`.
#[derive(Debug)]
pub struct PartialSignature<B: PairingBackend> {
    pub index: usize,
    pub point: B::G2,
}

impl<B: PairingBackend> Clone for PartialSignature<B> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            point: self.point,
        }
    }
}

impl<B: PairingBackend> PartialEq for PartialSignature<B> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.point == other.point
    }
}

/// A participant holding one Shamir share of the master secret.
///
/// # Security
///
/// The secret share has exactly one owner. `Node` is not `Clone`, overwrites
/// the share with zero when dropped, and leaves it out of `Debug` output.
pub struct Node<B: PairingBackend> {
    index: usize,
    secret_share: B::Scalar,
    public_share: PublicKey<B>,
}

impl<B: PairingBackend> Node<B> {
    pub(crate) fn new(index: usize, secret_share: B::Scalar) -> Self {
        let public_share = PublicKey::from_point(B::G1::generator().mul_scalar(&secret_share));
        Self {
            index,
            secret_share,
            public_share,
        }
    }

    /// 1-based position of this node in the scheme.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn public_share(&self) -> &PublicKey<B> {
        &self.public_share
    }

    pub(crate) fn secret_share(&self) -> &B::Scalar {
        &self.secret_share
    }

    /// Big-endian encoding of the secret share, for handing it to its owner.
    pub fn secret_share_bytes(&self) -> [u8; SCALAR_LEN] {
        self.secret_share.to_bytes_be()
    }
}

impl<B: PairingBackend> Drop for Node<B> {
    fn drop(&mut self) {
        clear_scalar(&mut self.secret_share);
    }
}

impl<B: PairingBackend> fmt::Debug for Node<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("secret_share", &"<redacted>")
            .field("public_share", &self.public_share)
            .finish()
    }
}

/// Output of key generation: the parameters, every node, and the group key.
///
/// Immutable once built; the secret polynomial that produced it is gone.
#[derive(Debug)]
pub struct SignatureScheme<B: PairingBackend> {
    params: SchemeParameters,
    nodes: Vec<Node<B>>,
    group_public_key: PublicKey<B>,
}

impl<B: PairingBackend> SignatureScheme<B> {
    pub(crate) fn new(
        params: SchemeParameters,
        nodes: Vec<Node<B>>,
        group_public_key: PublicKey<B>,
    ) -> Self {
        Self {
            params,
            nodes,
            group_public_key,
        }
    }

    pub fn params(&self) -> &SchemeParameters {
        &self.params
    }

    pub fn group_public_key(&self) -> &PublicKey<B> {
        &self.group_public_key
    }

    /// Nodes ordered by index, starting at 1.
    pub fn nodes(&self) -> &[Node<B>] {
        &self.nodes
    }

    /// Looks up a node by its 1-based index.
    pub fn node(&self, index: usize) -> Result<&Node<B>, Error> {
        self.params.check_index(index)?;
        self.nodes.get(index - 1).ok_or(Error::IndexOutOfRange {
            index,
            total_nodes: self.params.total_nodes,
        })
    }

    /// `(index, public share)` for every node.
    pub fn public_shares(&self) -> Vec<(usize, PublicKey<B>)> {
        self.nodes
            .iter()
            .map(|node| (node.index, node.public_share))
            .collect()
    }

    /// Hands the nodes out, e.g. to ship each one to its owner.
    pub fn into_nodes(self) -> Vec<Node<B>> {
        self.nodes
    }
}
