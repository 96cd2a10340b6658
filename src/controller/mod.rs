//! The list controller.
//!
//! Owns the current [`BlogViewState`], turns user intents into queries and
//! merges accepted results back into the state. All mutation goes through
//! `&mut self`, so the controller is the single writer of its state; query
//! results reach it as messages that the owner applies with
//! [`BlogController::next_update`], [`BlogController::process_pending`] or
//! [`BlogController::run_until_idle`].

mod coordinator;
mod dispatcher;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::blog::{BlogStateEvent, BlogViewState, BlogViewStateReducer, ViewStateIntent};
use crate::config::ControllerConfig;
use crate::data_state::{BlogPage, DataState};
use crate::error::FeedError;
use crate::model::{BlogFilter, BlogOrder, BlogPost};
use crate::mvi::{Publisher, Reducer};
use crate::preferences::{PreferenceStore, BLOG_FILTER, BLOG_ORDER};
use crate::query::{QueryFailure, QuerySource};
use crate::session::CredentialProvider;

pub use coordinator::CancellationCoordinator;
pub use dispatcher::{handle_state_event, DataStream};

use coordinator::{Payload, QueryMessage};

/// An accepted message from the current query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryUpdate {
    /// A data state was published and merged.
    Data {
        event: BlogStateEvent,
        state: DataState,
    },
    /// The query's stream ended.
    Completed { event: BlogStateEvent },
}

pub struct BlogController {
    view_state: Option<BlogViewState>,
    snapshots: Publisher<BlogViewState>,
    data_states: Publisher<DataState>,
    source: Arc<dyn QuerySource>,
    session: Arc<dyn CredentialProvider>,
    preferences: Arc<dyn PreferenceStore>,
    coordinator: CancellationCoordinator,
    inbox: mpsc::UnboundedReceiver<QueryMessage>,
    config: ControllerConfig,
}

impl BlogController {
    pub fn new(
        source: Arc<dyn QuerySource>,
        session: Arc<dyn CredentialProvider>,
        preferences: Arc<dyn PreferenceStore>,
        config: ControllerConfig,
    ) -> Self {
        let (sender, inbox) = mpsc::unbounded_channel();
        let mut controller = Self {
            view_state: None,
            snapshots: Publisher::new(),
            data_states: Publisher::new(),
            source,
            session,
            preferences,
            coordinator: CancellationCoordinator::new(sender),
            inbox,
            config,
        };
        // Start from an empty list. Equal to the default, so nothing is published.
        controller.set_blog_list_data(Vec::<BlogPost>::new());
        controller
    }

    /// Receive every view-state snapshot published from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<BlogViewState> {
        self.snapshots.subscribe()
    }

    /// Receive every accepted `{loading, data, error}` envelope from now on.
    pub fn subscribe_data_state(&mut self) -> mpsc::UnboundedReceiver<DataState> {
        self.data_states.subscribe()
    }

    /// Last published snapshot, if any.
    pub fn view_state(&self) -> Option<&BlogViewState> {
        self.view_state.as_ref()
    }

    pub fn current_view_state_or_new(&self) -> BlogViewState {
        self.view_state.clone().unwrap_or_default()
    }

    /// Number of snapshots published so far.
    pub fn snapshots_published(&self) -> u64 {
        self.snapshots.published()
    }

    pub fn has_query_in_flight(&self) -> bool {
        self.coordinator.has_outstanding()
    }

    // -- View state setters ---------------------------------------------------

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.apply_intent(ViewStateIntent::SetQuery {
            query: query.into(),
        });
    }

    /// Replace the list. Publishes nothing if the list is unchanged.
    pub fn set_blog_list_data(&mut self, blog_list: impl Into<Arc<Vec<BlogPost>>>) {
        self.apply_intent(ViewStateIntent::SetBlogListData {
            blog_list: blog_list.into(),
        });
    }

    pub fn increment_page_number(&mut self) {
        self.apply_intent(ViewStateIntent::IncrementPageNumber);
    }

    pub fn set_query_exhausted(&mut self, exhausted: bool) {
        self.apply_intent(ViewStateIntent::SetQueryExhausted { exhausted });
    }

    pub fn set_query_in_progress(&mut self, in_progress: bool) {
        self.apply_intent(ViewStateIntent::SetQueryInProgress { in_progress });
    }

    /// `None` leaves the current filter untouched.
    pub fn set_blog_filter(&mut self, filter: Option<BlogFilter>) {
        self.apply_intent(ViewStateIntent::SetBlogFilter { filter });
    }

    pub fn set_blog_order(&mut self, order: BlogOrder) {
        self.apply_intent(ViewStateIntent::SetBlogOrder { order });
    }

    pub fn reset_page(&mut self) {
        self.apply_intent(ViewStateIntent::ResetPage);
    }

    fn apply_intent(&mut self, intent: ViewStateIntent) {
        let current = self.current_view_state_or_new();
        if intent.is_noop_for(&current) {
            tracing::trace!(intent = intent.name(), "View state unchanged");
            return;
        }

        let name = intent.name();
        let next = BlogViewStateReducer::reduce(current, intent);
        tracing::trace!(
            intent = name,
            page = next.page,
            items = next.blog_list.len(),
            in_progress = next.is_query_in_progress,
            exhausted = next.is_query_exhausted,
            "View state updated"
        );
        self.view_state = Some(next.clone());
        self.snapshots.publish(next);
    }

    // -- Orchestration --------------------------------------------------------

    /// Dispatch `event` against the current state, superseding any
    /// outstanding query. Returns the generation of the new stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_state_event(&mut self, event: BlogStateEvent) -> u64 {
        let state = self.current_view_state_or_new();
        let stream = handle_state_event(event, &state, &*self.session, &*self.source);
        self.coordinator.launch(event, stream)
    }

    /// Start a fresh search for `query` from page 1.
    ///
    /// Resets exhaustion and the page together and reloads the ordering
    /// from preferences, so a new search never inherits stale pagination.
    pub fn load_first_page(&mut self, query: impl Into<String>) {
        self.set_query_in_progress(true);
        self.set_query_exhausted(false);
        self.reset_page();

        let filter = self
            .preferences
            .get(BLOG_FILTER, BlogFilter::DateUpdated.key());
        let filter = match filter.parse::<BlogFilter>() {
            Ok(filter) => Some(filter),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring stored blog filter");
                None
            }
        };
        self.set_blog_filter(filter);

        let order = self.preferences.get(BLOG_ORDER, BlogOrder::Asc.token());
        let order = order.parse::<BlogOrder>().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Stored blog order invalid, using ascending");
            BlogOrder::Asc
        });
        self.set_blog_order(order);

        self.set_query(query);
        self.set_state_event(BlogStateEvent::Search);
    }

    /// Load the page after the current one.
    ///
    /// A no-op while a query is in progress or once the results are
    /// exhausted. Returns whether a query was dispatched.
    pub fn load_next_page(&mut self) -> bool {
        let state = self.current_view_state_or_new();
        if !state.can_load_next_page() {
            tracing::debug!(
                in_progress = state.is_query_in_progress,
                exhausted = state.is_query_exhausted,
                page = state.page,
                "Next page skipped"
            );
            return false;
        }

        tracing::debug!(page = state.page + 1, "Loading next page");
        self.set_query_in_progress(true);
        self.increment_page_number();
        self.set_state_event(BlogStateEvent::NextPage);
        true
    }

    /// Show an unfiltered first page unless the list already has content.
    /// Returns whether a search was started.
    pub fn load_initial_blogs(&mut self) -> bool {
        if self.current_view_state_or_new().is_empty() {
            self.load_first_page("");
            true
        } else {
            false
        }
    }

    /// Abort the outstanding query and publish a terminal "not loading"
    /// state.
    pub fn cancel_requests(&mut self) {
        self.coordinator.cancel();
        self.source.cancel_requests();
        self.handle_pending_data();
    }

    /// Drop the controller: the outstanding query is aborted, the source's
    /// requests are cancelled and every subscription closes. No idle marker
    /// is dispatched since nothing would be left to apply it.
    pub fn close(self) {
        tracing::debug!(
            snapshots = self.snapshots.published(),
            in_flight = self.coordinator.has_outstanding(),
            "Closing blog controller"
        );
    }

    /// Dispatch the idle event so pending loading indicators are cleared.
    pub fn handle_pending_data(&mut self) {
        self.set_state_event(BlogStateEvent::None);
    }

    // -- Result handling ------------------------------------------------------

    /// Wait for the next message of the current query and apply it.
    /// Stale messages are dropped without touching state.
    ///
    /// Returns `None` right away when no query is outstanding, including
    /// after the current query's `Completed` update has been applied.
    pub async fn next_update(&mut self) -> Option<QueryUpdate> {
        while self.coordinator.has_outstanding() {
            let message = self.inbox.recv().await?;
            match self.apply_message(message) {
                Ok(update) => return Some(update),
                Err(err) => tracing::trace!(reason = %err, "Dropped query message"),
            }
        }
        None
    }

    /// Apply every message already queued, without waiting.
    /// Returns how many were accepted.
    pub fn process_pending(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(message) = self.inbox.try_recv() {
            match self.apply_message(message) {
                Ok(_) => accepted += 1,
                Err(err) => tracing::trace!(reason = %err, "Dropped query message"),
            }
        }
        accepted
    }

    /// Apply messages until the outstanding query (if any) has finished.
    pub async fn run_until_idle(&mut self) {
        while self.next_update().await.is_some() {}
        self.process_pending();
    }

    fn apply_message(&mut self, message: QueryMessage) -> Result<QueryUpdate, FeedError> {
        if !self.coordinator.is_current(message.generation) {
            return Err(FeedError::Superseded {
                generation: message.generation,
            });
        }

        let event = message.event;
        match message.payload {
            Payload::State(state) => {
                self.data_states.publish(state.clone());
                self.handle_data_state(event, &state);
                Ok(QueryUpdate::Data { event, state })
            }
            Payload::Completed => {
                self.coordinator.complete(message.generation);
                // The query is only over once its stream has ended.
                if self.current_view_state_or_new().is_query_in_progress {
                    self.set_query_in_progress(false);
                }
                Ok(QueryUpdate::Completed { event })
            }
        }
    }

    fn handle_data_state(&mut self, event: BlogStateEvent, state: &DataState) {
        if let Some(page) = &state.data {
            self.handle_incoming_blog_list_data(event, page);
        }
        if let Some(failure) = &state.error {
            self.handle_query_failure(event, failure);
        }
        // Failures release the guard at once; data waits for `Completed`.
        if state.error.is_some() && self.current_view_state_or_new().is_query_in_progress {
            self.set_query_in_progress(false);
        }
    }

    /// Merge an accepted batch: a search replaces the list, a next page
    /// appends to it. A short or final batch exhausts the query.
    fn handle_incoming_blog_list_data(&mut self, event: BlogStateEvent, page: &BlogPage) {
        let current = self.current_view_state_or_new();
        match event {
            BlogStateEvent::Search => self.set_blog_list_data(page.posts.clone()),
            BlogStateEvent::NextPage => {
                let mut merged: Vec<BlogPost> =
                    Vec::with_capacity(current.blog_list.len() + page.posts.len());
                merged.extend(current.blog_list.iter().cloned());
                merged.extend(page.posts.iter().cloned());
                self.set_blog_list_data(merged);
            }
            BlogStateEvent::None => {
                tracing::warn!("Ignoring data delivered for the idle event");
                return;
            }
        }

        let exhausted = !page.has_more || page.posts.len() < self.config.page_size;
        tracing::debug!(
            event = event.name(),
            received = page.posts.len(),
            exhausted,
            "Merged blog posts"
        );
        if exhausted && !current.is_query_exhausted {
            self.set_query_exhausted(true);
        }
    }

    fn handle_query_failure(&mut self, event: BlogStateEvent, failure: &QueryFailure) {
        let error = FeedError::QueryFailure {
            kind: failure.kind,
            message: failure.message.clone(),
        };
        tracing::warn!(event = event.name(), error = %error, "Query failed");

        if failure.kind.is_end_of_data() && !self.current_view_state_or_new().is_query_exhausted {
            self.set_query_exhausted(true);
        }
    }
}

impl Drop for BlogController {
    fn drop(&mut self) {
        if self.coordinator.cancel() {
            tracing::debug!("Controller dropped with a query in flight");
        }
        self.source.cancel_requests();
    }
}
