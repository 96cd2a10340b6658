//! Query source abstraction.
//!
//! The controller never talks to a transport directly. It hands a
//! [`QueryRequest`] to a [`QuerySource`] and consumes the returned stream of
//! [`QueryEnvelope`]s. Timeouts and retries are the source's business.

mod memory;

use std::fmt;
use std::pin::Pin;

use futures::Stream;
use thiserror::Error;

use crate::model::BlogPost;
use crate::session::AuthToken;

pub use memory::InMemoryQuerySource;

/// Message the server sends for a page past the end of the results.
pub const INVALID_PAGE_MESSAGE: &str = "Invalid page.";

/// Category of a failed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Parse,
    Server,
    Unauthorized,
    /// The requested page does not exist. Marks the end of the data.
    InvalidPage,
}

impl FailureKind {
    pub fn is_end_of_data(self) -> bool {
        matches!(self, FailureKind::InvalidPage)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Transport => "transport",
            FailureKind::Parse => "parse",
            FailureKind::Server => "server",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::InvalidPage => "invalid page",
        };
        f.write_str(name)
    }
}

/// Failure reported by a query source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl QueryFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result envelope. Consumed exactly once by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEnvelope {
    Batch { posts: Vec<BlogPost>, has_more: bool },
    Failure(QueryFailure),
    Cancelled,
}

/// Parameters of a single search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub token: AuthToken,
    pub query: String,
    /// Order token followed by the filter key, e.g. `-date_updated`.
    pub order_filter_key: String,
    /// 1-based.
    pub page: u32,
}

pub type QueryStream = Pin<Box<dyn Stream<Item = QueryEnvelope> + Send + 'static>>;

/// Executes searches on behalf of a controller.
pub trait QuerySource: Send + Sync {
    /// Start a search. The returned stream must be lazy enough to be dropped
    /// at any point before completion.
    fn search(&self, request: QueryRequest) -> QueryStream;

    /// Abort every outstanding request issued by this source. Results that
    /// arrive afterwards must be reported as [`QueryEnvelope::Cancelled`] or
    /// not at all.
    fn cancel_requests(&self);
}
