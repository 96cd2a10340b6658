//! Reducer for the blog list view state.

use crate::mvi::Reducer;

use super::intent::ViewStateIntent;
use super::state::BlogViewState;

/// Pure state transitions for the list view.
///
/// Publishing, logging and the no-op checks live in the controller around
/// the dispatch call.
pub struct BlogViewStateReducer;

impl Reducer for BlogViewStateReducer {
    type State = BlogViewState;
    type Intent = ViewStateIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ViewStateIntent::SetQuery { query } => BlogViewState {
                search_query: query,
                ..state
            },

            ViewStateIntent::SetBlogListData { blog_list } => BlogViewState { blog_list, ..state },

            ViewStateIntent::IncrementPageNumber => BlogViewState {
                page: state.page.saturating_add(1),
                ..state
            },

            ViewStateIntent::SetQueryExhausted { exhausted } => BlogViewState {
                is_query_exhausted: exhausted,
                ..state
            },

            ViewStateIntent::SetQueryInProgress { in_progress } => BlogViewState {
                is_query_in_progress: in_progress,
                ..state
            },

            ViewStateIntent::SetBlogFilter { filter } => match filter {
                Some(filter) => BlogViewState { filter, ..state },
                None => state,
            },

            ViewStateIntent::SetBlogOrder { order } => BlogViewState { order, ..state },

            ViewStateIntent::ResetPage => BlogViewState { page: 1, ..state },
        }
    }
}
