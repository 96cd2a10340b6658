//! Translates a state event into the stream the controller will observe.

use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use crate::blog::{BlogStateEvent, BlogViewState};
use crate::data_state::DataState;
use crate::error::FeedError;
use crate::query::{QueryRequest, QuerySource};
use crate::session::CredentialProvider;

pub type DataStream = Pin<Box<dyn Stream<Item = DataState> + Send + 'static>>;

/// Build the data stream for `event`.
///
/// `Search` and `NextPage` query the source with the parameters stored in
/// `view_state`; the caller is responsible for having set the page and the
/// progress flag beforehand. Without a session token the stream is empty and
/// the source is never called. `None` yields a single idle marker once the
/// stream is polled.
pub fn handle_state_event(
    event: BlogStateEvent,
    view_state: &BlogViewState,
    session: &dyn CredentialProvider,
    source: &dyn QuerySource,
) -> DataStream {
    if !event.issues_query() {
        return stream::once(async { DataState::idle() }).boxed();
    }

    let Some(token) = session.cached_token() else {
        tracing::debug!(
            event = event.name(),
            reason = %FeedError::NoCredential,
            "Dispatch produced no data"
        );
        return stream::empty().boxed();
    };

    let request = QueryRequest {
        token,
        query: view_state.search_query.clone(),
        order_filter_key: view_state.order_filter_key(),
        page: view_state.page,
    };
    tracing::debug!(
        event = event.name(),
        query = %request.query,
        order_filter_key = %request.order_filter_key,
        page = request.page,
        "Querying blog posts"
    );

    let results = source.search(request).map(DataState::from);
    stream::once(async { DataState::loading() })
        .chain(results)
        .boxed()
}
