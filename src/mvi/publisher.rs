//! Fan-out of published values to any number of subscribers.

use tokio::sync::mpsc;

/// Delivers every published value to each live subscriber, in order.
///
/// Unlike a watch channel nothing is coalesced: a subscriber that drains its
/// receiver sees one item per `publish` call. Subscribers that dropped their
/// receiver are pruned on the next publish.
pub struct Publisher<T> {
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    published: u64,
}

impl<T: Clone> Publisher<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            published: 0,
        }
    }

    /// Register a new subscriber. Only values published afterwards are seen.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, value: T) {
        self.published += 1;
        self.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Total number of values published since creation.
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}
