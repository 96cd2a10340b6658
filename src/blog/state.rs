//! State for the blog list view.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{order_filter_key, BlogFilter, BlogOrder, BlogPost};
use crate::mvi::ViewState;

/// Snapshot of the list view.
///
/// Owned by a single controller and replaced, never edited in place: each
/// accepted change produces a new value that is published to subscribers.
/// The list sits behind an `Arc` so cloning a snapshot does not copy posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogViewState {
    /// Posts in server order.
    pub blog_list: Arc<Vec<BlogPost>>,
    pub search_query: String,
    pub order: BlogOrder,
    pub filter: BlogFilter,
    /// 1-based page of the most recent request.
    pub page: u32,
    pub is_query_in_progress: bool,
    pub is_query_exhausted: bool,
}

impl Default for BlogViewState {
    fn default() -> Self {
        Self {
            blog_list: Arc::new(Vec::new()),
            search_query: String::new(),
            order: BlogOrder::default(),
            filter: BlogFilter::default(),
            page: 1,
            is_query_in_progress: false,
            is_query_exhausted: false,
        }
    }
}

impl ViewState for BlogViewState {}

impl BlogViewState {
    /// Composite key the query source sorts by.
    pub fn order_filter_key(&self) -> String {
        order_filter_key(self.order, self.filter)
    }

    pub fn is_empty(&self) -> bool {
        self.blog_list.is_empty()
    }

    /// Whether a next-page load may start.
    pub fn can_load_next_page(&self) -> bool {
        !self.is_query_in_progress && !self.is_query_exhausted
    }

    /// Same allocation or equal contents.
    pub fn same_list(&self, other: &Arc<Vec<BlogPost>>) -> bool {
        Arc::ptr_eq(&self.blog_list, other) || self.blog_list == *other
    }
}
