//! State-management core for a paginated, searchable blog post list.
//!
//! [`controller::BlogController`] owns the list's view state, turns intents
//! (search, next page, cancel) into queries against a
//! [`query::QuerySource`], and publishes an immutable snapshot after every
//! change.

pub mod blog;
pub mod config;
pub mod controller;
pub mod data_state;
pub mod error;
pub mod logging;
pub mod model;
pub mod mvi;
pub mod preferences;
pub mod query;
pub mod session;
