/// Marker for snapshot types a controller publishes.
///
/// A snapshot is cloned to derive the next one and compared to detect
/// no-op updates.
pub trait ViewState: Clone + PartialEq + Default + Send + 'static {}
