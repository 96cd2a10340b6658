//! Model-View-Intent (MVI) primitives.
//!
//! Unidirectional data flow for the list view state:
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Publisher ──→ subscribers
//!    ↑                                              │
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot (Clone to derive the next one)
//! - **Intent**: a single requested change
//! - **Reducer**: pure function that transforms state based on intents
//! - **Publisher**: fan-out of every published snapshot

mod intent;
mod publisher;
mod reducer;
mod state;

pub use intent::Intent;
pub use publisher::Publisher;
pub use reducer::Reducer;
pub use state::ViewState;
