//! Error types for the crate.
//!
//! This module defines low-level backend errors returned by the concrete
//! pairing backends (blstrs, Arkworks) as well as the high-level `Error`
//! type returned by every public operation.
//!
//! Backend errors are folded into the public error kinds through a single
//! `From` impl, so callers only ever match on [`Error`].
//!
//! # Examples
//!
//! ```rust
//! use tbls::errors::{BackendError, Error};
//!
//! let err: Error = BackendError::NotOnCurve("g1 point").into();
//! assert!(matches!(err, Error::CurveMembershipError(_)));
//! ```

use thiserror::Error;

/// Errors bubbled up from backend implementations (blstrs, Arkworks).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("serialization failure: {0}")]
    Serialization(&'static str),
    #[error("point is not on the curve: {0}")]
    NotOnCurve(&'static str),
    #[error("point is not in the prime-order subgroup: {0}")]
    NotInSubgroup(&'static str),
    #[error("invalid encoding length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("hash to curve failed: {0}")]
    HashToCurve(String),
    #[error("math error: {0}")]
    Math(&'static str),
}

/// High-level errors returned by the threshold signature API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("randomness source failed: {0}")]
    RandomnessFailure(String),
    #[error("node index {index} outside [1, {total_nodes}]")]
    IndexOutOfRange { index: usize, total_nodes: usize },
    #[error("duplicate share for node index {0}")]
    DuplicateShare(usize),
    #[error("insufficient shares: required {required}, provided {provided}")]
    InsufficientShares { required: usize, provided: usize },
    #[error("deserialization error: {0}")]
    DeserializationError(String),
    #[error("curve membership error: {0}")]
    CurveMembershipError(String),
    #[error("verification backends disagree: backend a = {backend_a}, backend b = {backend_b}")]
    BackendMismatch { backend_a: bool, backend_b: bool },
    #[error("pairing check failure: {0}")]
    PairingCheckFailure(String),
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Serialization(_) | BackendError::InvalidLength { .. } => {
                Error::DeserializationError(err.to_string())
            }
            BackendError::NotOnCurve(_) | BackendError::NotInSubgroup(_) => {
                Error::CurveMembershipError(err.to_string())
            }
            BackendError::HashToCurve(_) | BackendError::Math(_) => {
                Error::PairingCheckFailure(err.to_string())
            }
        }
    }
}
