use super::intent::Intent;
use super::state::ViewState;

/// Pure `(State, Intent) -> State` transition.
///
/// Controllers never edit a snapshot in place; they hand the current one and
/// an intent to a reducer and publish whatever comes back.
pub trait Reducer {
    type State: ViewState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
