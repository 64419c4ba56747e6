//! Configuration types for the threshold signature scheme.
//!
//! This module holds the `(t, n)` parameters that shape a scheme, the
//! identifiers of the two pairing backends, and the ciphersuite constant
//! shared by signing and verification.
//!
//! # Example
//!
//! ```rust
//! use tbls::SchemeParameters;
//!
//! // 3-of-5 threshold
//! let params = SchemeParameters::new(3, 5).expect("valid params");
//! assert_eq!(params.threshold, 3);
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Domain separation tag used for hashing messages to G2.
///
/// This is the proof-of-possession ciphersuite of the IETF BLS signature
/// draft for signatures in G2 and public keys in G1.
pub const CIPHERSUITE_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Pairing backend implementations.
///
/// Both backends implement BLS12-381 and are compiled side by side so the
/// verifier can evaluate the same pairing equation twice:
///
/// - **Blst**: blstrs, assembly-optimized, works on native in-memory points.
/// - **Arkworks**: pure Rust, re-derives its points from the fixed-width byte
///   encodings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BackendId {
    /// blstrs backend (optimized assembly)
    Blst,
    /// Arkworks backend (pure Rust)
    Arkworks,
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendId::Blst => f.write_str("blst"),
            BackendId::Arkworks => f.write_str("arkworks"),
        }
    }
}

/// Threshold scheme parameters.
///
/// # Fields
///
/// - `threshold`: Minimum number of participants needed to sign (t).
/// - `total_nodes`: Total number of participants (n).
///
/// # Constraints
///
/// `1 ≤ threshold ≤ total_nodes`. Values are immutable once a scheme has been
/// initialized with them.
///
/// # Example
///
/// ```rust
/// use tbls::SchemeParameters;
///
/// assert!(SchemeParameters::new(4, 3).is_err());
/// assert!(SchemeParameters::new(0, 3).is_err());
/// assert!(SchemeParameters::new(3, 3).is_ok());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchemeParameters {
    /// Number of partial signatures required to recover a group signature
    pub threshold: usize,
    /// Number of participants holding a share
    pub total_nodes: usize,
}

impl SchemeParameters {
    /// Creates and validates scheme parameters.
    pub fn new(threshold: usize, total_nodes: usize) -> Result<Self, Error> {
        let params = Self {
            threshold,
            total_nodes,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validates the parameters.
    ///
    /// Parameters built with [`SchemeParameters::new`] are always valid; this
    /// is for values that arrive through deserialization.
    pub fn validate(&self) -> Result<(), Error> {
        if self.threshold == 0 {
            return Err(Error::InvalidParameters(
                "threshold must be at least 1".into(),
            ));
        }
        if self.threshold > self.total_nodes {
            return Err(Error::InvalidParameters(format!(
                "threshold {} cannot be greater than total nodes {}",
                self.threshold, self.total_nodes
            )));
        }
        Ok(())
    }

    /// Returns `Ok(())` if `index` names a node of this scheme.
    pub fn check_index(&self, index: usize) -> Result<(), Error> {
        if index == 0 || index > self.total_nodes {
            return Err(Error::IndexOutOfRange {
                index,
                total_nodes: self.total_nodes,
            });
        }
        Ok(())
    }
}
