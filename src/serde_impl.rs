//! Serde serialization support for public signing artifacts.
//!
//! # Serialization Strategy
//!
//! - **Curve Points** ([`PublicKey`], [`GroupSignature`]): the fixed-width
//!   encoding shared by all backends. Human-readable formats get a lowercase
//!   hex string, binary formats get raw bytes.
//! - **Partial Signatures**: a struct of `index` and the encoded G2 point.
//! - **Nodes**: not serializable. Secret shares leave a [`Node`](crate::Node)
//!   only through [`Node::secret_share_bytes`](crate::Node::secret_share_bytes).
//!
//! Deserialization runs the full decode path, so points are checked for curve
//! and subgroup membership.
//!
//! # Example
//!
//! ```rust
//! use tbls::{BlstBackend, PublicKey, ThresholdBls, ThresholdScheme};
//! use rand::thread_rng;
//!
//! let keys = ThresholdBls::<BlstBackend>::default()
//!     .initialize(&mut thread_rng(), 2, 3)
//!     .unwrap();
//!
//! let json = serde_json::to_string(keys.group_public_key()).unwrap();
//! let restored: PublicKey<BlstBackend> = serde_json::from_str(&json).unwrap();
//! assert_eq!(&restored, keys.group_public_key());
//! ```

use core::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    backend::PairingBackend,
    protocol::{GroupSignature, PartialSignature, PublicKey},
};

/// Owned point encoding with format-dependent serde representation.
struct EncodedPoint(Vec<u8>);

impl Serialize for EncodedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(&self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

struct EncodedPointVisitor;

impl<'de> Visitor<'de> for EncodedPointVisitor {
    type Value = EncodedPoint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex string or byte array holding an encoded curve point")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        hex::decode(v).map(EncodedPoint).map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(EncodedPoint(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(EncodedPoint(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(EncodedPoint(bytes))
    }
}

impl<'de> Deserialize<'de> for EncodedPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(EncodedPointVisitor)
        } else {
            deserializer.deserialize_bytes(EncodedPointVisitor)
        }
    }
}

impl<B: PairingBackend> Serialize for PublicKey<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EncodedPoint(self.to_bytes().to_vec()).serialize(serializer)
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for PublicKey<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let EncodedPoint(bytes) = EncodedPoint::deserialize(deserializer)?;
        PublicKey::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

impl<B: PairingBackend> Serialize for GroupSignature<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EncodedPoint(self.to_bytes().to_vec()).serialize(serializer)
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for GroupSignature<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let EncodedPoint(bytes) = EncodedPoint::deserialize(deserializer)?;
        GroupSignature::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct PartialSignatureRepr {
    index: usize,
    signature: EncodedPoint,
}

impl<B: PairingBackend> Serialize for PartialSignature<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PartialSignatureRepr {
            index: self.index,
            signature: EncodedPoint(B::encode_g2(&self.point).to_vec()),
        }
        .serialize(serializer)
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for PartialSignature<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PartialSignatureRepr::deserialize(deserializer)?;
        let point = B::decode_g2(&repr.signature.0).map_err(de::Error::custom)?;
        Ok(PartialSignature {
            index: repr.index,
            point,
        })
    }
}
