//! Errors raised inside the controller.

use thiserror::Error;

use crate::query::FailureKind;

/// Failure modes of a dispatched query.
///
/// None of them is fatal: each leaves the view state re-queryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Search attempted without a session token. Degrades to an empty stream.
    #[error("No session token available; query skipped")]
    NoCredential,

    /// The query source reported an error. Surfaced as an error data state.
    #[error("Query failed ({kind}): {message}")]
    QueryFailure { kind: FailureKind, message: String },

    /// A result arrived for a request that was cancelled or replaced.
    #[error("Result of generation {generation} was superseded")]
    Superseded { generation: u64 },
}
