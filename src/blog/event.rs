//! State events for the blog list.

use crate::mvi::Intent;

/// Events that make the controller talk to the query source.
///
/// Always refer to the variants qualified (`BlogStateEvent::None`) so the
/// idle variant is never confused with `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogStateEvent {
    /// Query the first page for the current search parameters.
    Search,

    /// Query the page currently stored in the view state.
    NextPage,

    /// Issue no query; emit a single "not loading" marker.
    None,
}

impl Intent for BlogStateEvent {}

impl BlogStateEvent {
    pub fn name(self) -> &'static str {
        match self {
            BlogStateEvent::Search => "search",
            BlogStateEvent::NextPage => "next_page",
            BlogStateEvent::None => "none",
        }
    }

    /// Whether the event hits the query source.
    pub fn issues_query(self) -> bool {
        !matches!(self, BlogStateEvent::None)
    }
}
