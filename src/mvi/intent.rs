/// Marker for values a [`Reducer`](super::Reducer) or dispatcher consumes:
/// single-field changes and query-triggering state events alike.
pub trait Intent: Send + 'static {}
