//! Tests for first-page, next-page and initial loads against a scripted source.

mod common;

use blog_feed::blog::BlogStateEvent;
use blog_feed::controller::QueryUpdate;
use blog_feed::data_state::DataState;
use blog_feed::model::{BlogFilter, BlogOrder};
use blog_feed::preferences::{BLOG_FILTER, BLOG_ORDER};
use blog_feed::query::{FailureKind, QueryEnvelope, QueryFailure, INVALID_PAGE_MESSAGE};
use common::*;

// -- First page ----------------------------------------------------------------

#[tokio::test]
async fn initial_load_searches_page_one_with_empty_query() {
    let mut h = harness();
    h.source.enqueue(batch(1..=10, true));

    assert!(h.controller.load_initial_blogs());

    let requests = h.source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].page, 1);
    assert_eq!(requests[0].query, "");
    assert_eq!(requests[0].order_filter_key, "date_updated");

    settle(&mut h.controller).await;
    let state = h.controller.current_view_state_or_new();
    assert_eq!(*state.blog_list, posts(1..=10));
    assert!(!state.is_query_in_progress);
    assert!(!state.is_query_exhausted);
}

#[tokio::test]
async fn initial_load_skipped_when_list_has_content() {
    let mut h = harness();
    h.controller.set_blog_list_data(posts(1..=3));

    assert!(!h.controller.load_initial_blogs());
    assert_eq!(h.source.request_count(), 0);
    assert!(!h.controller.has_query_in_flight());
}

#[tokio::test]
async fn first_page_resets_pagination_before_dispatch() {
    let mut h = harness();
    h.controller.increment_page_number();
    h.controller.increment_page_number();
    h.controller.set_query_exhausted(true);

    h.controller.load_first_page("rust");

    let state = h.controller.current_view_state_or_new();
    assert_eq!(state.page, 1);
    assert!(!state.is_query_exhausted);
    assert!(state.is_query_in_progress);
    assert_eq!(state.search_query, "rust");

    let requests = h.source.requests();
    assert_eq!(requests[0].page, 1);
    assert_eq!(requests[0].query, "rust");
}

#[tokio::test]
async fn search_replaces_existing_list() {
    let mut h = harness();
    h.controller.set_blog_list_data(posts(100..=104));
    h.source.enqueue(batch(1..=10, true));

    h.controller.load_first_page("new");
    settle(&mut h.controller).await;

    assert_eq!(*h.controller.current_view_state_or_new().blog_list, posts(1..=10));
}

#[tokio::test]
async fn data_state_subscribers_see_loading_then_data() {
    let mut h = harness();
    let mut data_states = h.controller.subscribe_data_state();
    h.source.enqueue(batch(1..=10, true));

    h.controller.load_first_page("");

    match next_update(&mut h.controller).await {
        QueryUpdate::Data { event, state } => {
            assert_eq!(event, BlogStateEvent::Search);
            assert_eq!(state, DataState::loading());
        }
        other => panic!("expected loading state, got {other:?}"),
    }
    assert!(h.controller.current_view_state_or_new().is_query_in_progress);

    match next_update(&mut h.controller).await {
        QueryUpdate::Data { state, .. } => {
            assert!(!state.loading);
            assert_eq!(state.data.map(|page| page.posts.len()), Some(10));
        }
        other => panic!("expected data state, got {other:?}"),
    }
    assert!(h.controller.current_view_state_or_new().is_query_in_progress);

    assert_eq!(
        next_update(&mut h.controller).await,
        QueryUpdate::Completed {
            event: BlogStateEvent::Search
        }
    );
    assert!(!h.controller.has_query_in_flight());
    assert!(!h.controller.current_view_state_or_new().is_query_in_progress);

    let seen = drain(&mut data_states);
    assert_eq!(seen.len(), 2);
    assert!(seen[0].loading);
    assert!(seen[1].data.is_some());
}

// -- Preferences ---------------------------------------------------------------

#[tokio::test]
async fn stored_preferences_drive_order_filter_key() {
    let mut h = harness();
    h.preferences.set(BLOG_FILTER, "username");
    h.preferences.set(BLOG_ORDER, "-");

    h.controller.load_first_page("");

    let state = h.controller.current_view_state_or_new();
    assert_eq!(state.filter, BlogFilter::Username);
    assert_eq!(state.order, BlogOrder::Desc);
    assert_eq!(h.source.requests()[0].order_filter_key, "-username");
}

#[tokio::test]
async fn unknown_stored_values_fall_back() {
    let mut h = harness();
    h.controller.set_blog_filter(Some(BlogFilter::Username));
    h.controller.set_blog_order(BlogOrder::Desc);
    h.preferences.set(BLOG_FILTER, "title");
    h.preferences.set(BLOG_ORDER, "sideways");

    h.controller.load_first_page("");

    let state = h.controller.current_view_state_or_new();
    // An unknown filter is ignored, an unknown order resets to ascending.
    assert_eq!(state.filter, BlogFilter::Username);
    assert_eq!(state.order, BlogOrder::Asc);
    assert_eq!(h.source.requests()[0].order_filter_key, "username");
}

// -- Next page -----------------------------------------------------------------

#[tokio::test]
async fn next_page_skipped_while_in_progress() {
    let mut h = harness();
    h.controller.set_query_in_progress(true);

    assert!(!h.controller.load_next_page());
    assert_eq!(h.source.request_count(), 0);
    assert_eq!(h.controller.current_view_state_or_new().page, 1);
}

#[tokio::test]
async fn next_page_skipped_once_exhausted() {
    let mut h = harness();
    h.controller.set_query_exhausted(true);

    assert!(!h.controller.load_next_page());
    assert_eq!(h.source.request_count(), 0);
    assert_eq!(h.controller.current_view_state_or_new().page, 1);
}

#[tokio::test]
async fn next_page_requests_following_page_and_appends() {
    let mut h = harness();
    h.controller.set_blog_list_data(posts(1..=30));
    h.controller.increment_page_number();
    h.controller.increment_page_number();
    h.source.enqueue(batch(31..=40, true));

    assert!(h.controller.load_next_page());

    let state = h.controller.current_view_state_or_new();
    assert_eq!(state.page, 4);
    assert!(state.is_query_in_progress);
    assert_eq!(h.source.requests()[0].page, 4);

    settle(&mut h.controller).await;
    let state = h.controller.current_view_state_or_new();
    assert_eq!(*state.blog_list, posts(1..=40));
    assert!(!state.is_query_in_progress);
    assert!(!state.is_query_exhausted);
}

#[tokio::test]
async fn paging_through_results_until_short_page() {
    let mut h = harness();
    h.source.enqueue(batch(1..=10, true));
    h.source.enqueue(batch(11..=20, true));
    h.source.enqueue(batch(21..=23, false));

    h.controller.load_initial_blogs();
    settle(&mut h.controller).await;
    while h.controller.load_next_page() {
        settle(&mut h.controller).await;
    }

    let state = h.controller.current_view_state_or_new();
    assert_eq!(*state.blog_list, posts(1..=23));
    assert_eq!(state.page, 3);
    assert!(state.is_query_exhausted);

    let pages: Vec<u32> = h.source.requests().iter().map(|r| r.page).collect();
    assert_eq!(pages, [1, 2, 3]);
}

// -- Exhaustion ----------------------------------------------------------------

#[tokio::test]
async fn short_page_exhausts_query() {
    let mut h = harness();
    h.source.enqueue(batch(1..=4, true));

    h.controller.load_first_page("");
    settle(&mut h.controller).await;

    assert!(h.controller.current_view_state_or_new().is_query_exhausted);
}

#[tokio::test]
async fn final_full_page_exhausts_query() {
    let mut h = harness();
    h.source.enqueue(batch(1..=10, false));

    h.controller.load_first_page("");
    settle(&mut h.controller).await;

    assert!(h.controller.current_view_state_or_new().is_query_exhausted);
}

#[tokio::test]
async fn invalid_page_exhausts_query() {
    let mut h = harness();
    h.source.enqueue(batch(1..=10, true));
    h.source.enqueue(vec![QueryEnvelope::Failure(QueryFailure::new(
        FailureKind::InvalidPage,
        INVALID_PAGE_MESSAGE,
    ))]);

    h.controller.load_first_page("");
    settle(&mut h.controller).await;
    assert!(h.controller.load_next_page());
    settle(&mut h.controller).await;

    let state = h.controller.current_view_state_or_new();
    assert!(state.is_query_exhausted);
    assert!(!state.is_query_in_progress);
    assert_eq!(*state.blog_list, posts(1..=10));
    assert!(!h.controller.load_next_page());
}

// -- Failures ------------------------------------------------------------------

#[tokio::test]
async fn failure_clears_progress_and_keeps_exhaustion() {
    let mut h = harness();
    h.controller.set_blog_list_data(posts(1..=10));
    h.source.enqueue(vec![QueryEnvelope::Failure(QueryFailure::new(
        FailureKind::Transport,
        "connection reset",
    ))]);

    assert!(h.controller.load_next_page());
    settle(&mut h.controller).await;

    let state = h.controller.current_view_state_or_new();
    assert!(!state.is_query_in_progress);
    assert!(!state.is_query_exhausted);
    assert_eq!(*state.blog_list, posts(1..=10));
    // The page is not rolled back.
    assert_eq!(state.page, 2);
    assert!(h.controller.load_next_page());
}

#[tokio::test]
async fn cancelled_envelope_only_clears_progress() {
    let mut h = harness();
    h.controller.set_blog_list_data(posts(1..=10));
    h.source.enqueue(vec![QueryEnvelope::Cancelled]);

    h.controller.load_next_page();
    settle(&mut h.controller).await;

    let state = h.controller.current_view_state_or_new();
    assert!(!state.is_query_in_progress);
    assert!(!state.is_query_exhausted);
    assert_eq!(*state.blog_list, posts(1..=10));
}

// -- Session -------------------------------------------------------------------

#[tokio::test]
async fn missing_session_issues_no_request() {
    let mut h = harness();
    h.session.logout();
    let mut data_states = h.controller.subscribe_data_state();

    h.controller.load_first_page("rust");
    assert!(h.controller.current_view_state_or_new().is_query_in_progress);

    assert_eq!(
        next_update(&mut h.controller).await,
        QueryUpdate::Completed {
            event: BlogStateEvent::Search
        }
    );

    assert_eq!(h.source.request_count(), 0);
    assert!(drain(&mut data_states).is_empty());
    let state = h.controller.current_view_state_or_new();
    assert!(!state.is_query_in_progress);
    assert!(state.blog_list.is_empty());
}

// -- Streaming sources ---------------------------------------------------------

#[tokio::test]
async fn guard_holds_until_stream_ends() {
    let mut h = harness();
    h.source.enqueue_open(batch(1..=10, true));

    h.controller.load_first_page("");
    next_update(&mut h.controller).await;
    assert!(matches!(
        next_update(&mut h.controller).await,
        QueryUpdate::Data { ref state, .. } if state.data.is_some()
    ));

    let state = h.controller.current_view_state_or_new();
    assert_eq!(*state.blog_list, posts(1..=10));
    assert!(state.is_query_in_progress);
    assert!(h.controller.has_query_in_flight());

    assert!(!h.controller.load_next_page());
    assert_eq!(h.source.request_count(), 1);
}

#[tokio::test]
async fn failure_releases_guard_while_stream_open() {
    let mut h = harness();
    h.source.enqueue_open(vec![QueryEnvelope::Failure(QueryFailure::new(
        FailureKind::Server,
        "internal error",
    ))]);

    h.controller.load_first_page("");
    next_update(&mut h.controller).await;
    next_update(&mut h.controller).await;

    assert!(!h.controller.current_view_state_or_new().is_query_in_progress);
    assert!(h.controller.load_next_page());
    assert_eq!(h.source.request_count(), 2);
}

#[tokio::test]
async fn next_update_returns_none_when_idle() {
    let mut h = harness();
    assert_eq!(h.controller.next_update().await, None);

    h.source.enqueue(batch(1..=10, true));
    h.controller.load_first_page("");
    settle(&mut h.controller).await;

    assert_eq!(h.controller.next_update().await, None);
}
