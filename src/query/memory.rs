//! In-process query source over a fixed set of posts.
//!
//! Behaves like the remote search endpoint: filters by a case-insensitive
//! substring, sorts by the composite ordering key, serves fixed-size pages and
//! answers a page past the end with an invalid-page failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;

use crate::model::{BlogFilter, BlogPost, PAGINATION_PAGE_SIZE};

use super::{
    FailureKind, QueryEnvelope, QueryFailure, QueryRequest, QuerySource, QueryStream,
    INVALID_PAGE_MESSAGE,
};

pub struct InMemoryQuerySource {
    posts: Arc<Vec<BlogPost>>,
    page_size: usize,
    latency: Duration,
    cancel_epoch: Arc<AtomicU64>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl InMemoryQuerySource {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self {
            posts: Arc::new(posts),
            page_size: PAGINATION_PAGE_SIZE,
            latency: Duration::ZERO,
            cancel_epoch: Arc::new(AtomicU64::new(0)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Delay before each response is produced.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    fn execute(posts: &[BlogPost], page_size: usize, request: &QueryRequest) -> QueryEnvelope {
        if request.token.is_blank() {
            return QueryEnvelope::Failure(QueryFailure::new(
                FailureKind::Unauthorized,
                "Authentication credentials were not provided.",
            ));
        }

        let (descending, key) = match request.order_filter_key.strip_prefix('-') {
            Some(key) => (true, key),
            None => (false, request.order_filter_key.as_str()),
        };
        let filter: BlogFilter = match key.parse() {
            Ok(filter) => filter,
            Err(err) => {
                return QueryEnvelope::Failure(QueryFailure::new(FailureKind::Parse, err.to_string()))
            }
        };

        let needle = request.query.to_lowercase();
        let mut matches: Vec<&BlogPost> = posts
            .iter()
            .filter(|post| {
                needle.is_empty()
                    || post.title.to_lowercase().contains(&needle)
                    || post.body.to_lowercase().contains(&needle)
                    || post.username.to_lowercase().contains(&needle)
            })
            .collect();

        match filter {
            BlogFilter::DateUpdated => {
                matches.sort_by(|a, b| a.date_updated.cmp(&b.date_updated).then(a.pk.cmp(&b.pk)))
            }
            BlogFilter::Username => {
                matches.sort_by(|a, b| a.username.cmp(&b.username).then(a.pk.cmp(&b.pk)))
            }
        }
        if descending {
            matches.reverse();
        }

        let Some(index) = request.page.checked_sub(1) else {
            return QueryEnvelope::Failure(QueryFailure::new(
                FailureKind::InvalidPage,
                INVALID_PAGE_MESSAGE,
            ));
        };
        let start = match (index as usize).checked_mul(page_size) {
            Some(start) if start < matches.len() || request.page == 1 => start,
            _ => {
                return QueryEnvelope::Failure(QueryFailure::new(
                    FailureKind::InvalidPage,
                    INVALID_PAGE_MESSAGE,
                ))
            }
        };

        let end = start.saturating_add(page_size).min(matches.len());
        QueryEnvelope::Batch {
            posts: matches[start.min(end)..end].iter().map(|post| (*post).clone()).collect(),
            has_more: end < matches.len(),
        }
    }
}

impl QuerySource for InMemoryQuerySource {
    fn search(&self, request: QueryRequest) -> QueryStream {
        tracing::debug!(
            query = %request.query,
            order_filter_key = %request.order_filter_key,
            page = request.page,
            "In-memory search"
        );
        self.requests.lock().push(request.clone());

        let posts = Arc::clone(&self.posts);
        let page_size = self.page_size;
        let latency = self.latency;
        let cancel_epoch = Arc::clone(&self.cancel_epoch);
        let issued_at = cancel_epoch.load(Ordering::SeqCst);

        stream::once(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if cancel_epoch.load(Ordering::SeqCst) != issued_at {
                return QueryEnvelope::Cancelled;
            }
            Self::execute(&posts, page_size, &request)
        })
        .boxed()
    }

    fn cancel_requests(&self) {
        self.cancel_epoch.fetch_add(1, Ordering::SeqCst);
    }
}
