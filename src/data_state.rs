//! Tagged envelope delivered to data-state subscribers.

use crate::model::BlogPost;
use crate::query::{QueryEnvelope, QueryFailure};

/// One accepted batch of posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPage {
    pub posts: Vec<BlogPost>,
    pub has_more: bool,
}

/// `{loading, data, error}` as seen by subscribers of the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataState {
    pub loading: bool,
    pub data: Option<BlogPage>,
    pub error: Option<QueryFailure>,
}

impl DataState {
    /// A query has started.
    pub fn loading() -> Self {
        Self {
            loading: true,
            data: None,
            error: None,
        }
    }

    /// Not loading, no payload.
    pub fn idle() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
        }
    }

    pub fn data(page: BlogPage) -> Self {
        Self {
            loading: false,
            data: Some(page),
            error: None,
        }
    }

    pub fn error(failure: QueryFailure) -> Self {
        Self {
            loading: false,
            data: None,
            error: Some(failure),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

impl From<QueryEnvelope> for DataState {
    fn from(envelope: QueryEnvelope) -> Self {
        match envelope {
            QueryEnvelope::Batch { posts, has_more } => DataState::data(BlogPage { posts, has_more }),
            QueryEnvelope::Failure(failure) => DataState::error(failure),
            QueryEnvelope::Cancelled => DataState::idle(),
        }
    }
}
