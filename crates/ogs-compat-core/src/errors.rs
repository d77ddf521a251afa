//! Shared error types

use thiserror::Error;

use crate::Rank;

/// Core errors shared between the browser bindings and tools
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("schema translation failed: {0}")]
    Transform(#[from] TransformError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raised by a registered schema transform.
///
/// The translator hands these back to the caller untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("rank {0:?} has no legacy ranking value")]
    UnencodableRank(Rank),

    #[error("field `{field}` has an unexpected shape: {reason}")]
    UnexpectedShape { field: String, reason: String },
}
