//! Blog list feature module.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - The list view snapshot
//! - `intent.rs` - Single-field changes (one per setter)
//! - `reducer.rs` - State transitions
//! - `event.rs` - State events that trigger queries

mod event;
mod intent;
mod reducer;
mod state;

pub use event::BlogStateEvent;
pub use intent::ViewStateIntent;
pub use reducer::BlogViewStateReducer;
pub use state::BlogViewState;
