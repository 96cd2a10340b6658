//! Intents for the blog list view state.

use std::sync::Arc;

use crate::model::{BlogFilter, BlogOrder, BlogPost};
use crate::mvi::Intent;

use super::state::BlogViewState;

/// One intent per view-state setter. Each touches exactly one field.
#[derive(Debug, Clone)]
pub enum ViewStateIntent {
    SetQuery { query: String },

    /// Replace the list. Dropped when the list is unchanged.
    SetBlogListData { blog_list: Arc<Vec<BlogPost>> },

    IncrementPageNumber,

    SetQueryExhausted { exhausted: bool },

    SetQueryInProgress { in_progress: bool },

    /// A missing filter leaves the current one in place.
    SetBlogFilter { filter: Option<BlogFilter> },

    SetBlogOrder { order: BlogOrder },

    ResetPage,
}

impl Intent for ViewStateIntent {}

impl ViewStateIntent {
    /// True when applying the intent must not publish a snapshot.
    pub fn is_noop_for(&self, state: &BlogViewState) -> bool {
        match self {
            ViewStateIntent::SetBlogListData { blog_list } => state.same_list(blog_list),
            ViewStateIntent::SetBlogFilter { filter } => filter.is_none(),
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewStateIntent::SetQuery { .. } => "set_query",
            ViewStateIntent::SetBlogListData { .. } => "set_blog_list_data",
            ViewStateIntent::IncrementPageNumber => "increment_page_number",
            ViewStateIntent::SetQueryExhausted { .. } => "set_query_exhausted",
            ViewStateIntent::SetQueryInProgress { .. } => "set_query_in_progress",
            ViewStateIntent::SetBlogFilter { .. } => "set_blog_filter",
            ViewStateIntent::SetBlogOrder { .. } => "set_blog_order",
            ViewStateIntent::ResetPage => "reset_page",
        }
    }
}
