//! Last-request-wins bookkeeping for a single controller.
//!
//! Every dispatched stream is drained by a forwarder task that tags each item
//! with the generation it was launched under and sends it to the controller's
//! inbox. Launching or cancelling advances the generation, so anything still
//! queued from an older stream is recognisably stale.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::blog::BlogStateEvent;
use crate::data_state::DataState;

use super::dispatcher::DataStream;

/// What a forwarder task hands back to the controller.
#[derive(Debug)]
pub enum Payload {
    State(DataState),
    /// The stream ended.
    Completed,
}

#[derive(Debug)]
pub struct QueryMessage {
    pub generation: u64,
    pub event: BlogStateEvent,
    pub payload: Payload,
}

struct InFlight {
    generation: u64,
    event: BlogStateEvent,
    request_id: Uuid,
    task: JoinHandle<()>,
}

pub struct CancellationCoordinator {
    generation: u64,
    in_flight: Option<InFlight>,
    sender: mpsc::UnboundedSender<QueryMessage>,
}

impl CancellationCoordinator {
    pub fn new(sender: mpsc::UnboundedSender<QueryMessage>) -> Self {
        Self {
            generation: 0,
            in_flight: None,
            sender,
        }
    }

    /// Start forwarding `stream`, superseding whatever was outstanding.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn launch(&mut self, event: BlogStateEvent, stream: DataStream) -> u64 {
        if let Some(previous) = self.advance() {
            previous.task.abort();
            tracing::debug!(
                request_id = %previous.request_id,
                generation = previous.generation,
                event = previous.event.name(),
                "Superseded outstanding query"
            );
        }

        let generation = self.generation;
        let request_id = Uuid::new_v4();
        let task = tokio::spawn(forward(generation, event, stream, self.sender.clone()));
        tracing::trace!(%request_id, generation, event = event.name(), "Query launched");

        self.in_flight = Some(InFlight {
            generation,
            event,
            request_id,
            task,
        });
        generation
    }

    /// Abort the outstanding stream, if any. Messages it already queued
    /// become stale. Returns whether something was outstanding.
    pub fn cancel(&mut self) -> bool {
        match self.advance() {
            Some(previous) => {
                previous.task.abort();
                tracing::debug!(
                    request_id = %previous.request_id,
                    generation = previous.generation,
                    event = previous.event.name(),
                    "Cancelled outstanding query"
                );
                true
            }
            None => false,
        }
    }

    /// Only messages of the current generation may touch state.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Mark the stream of `generation` as finished.
    pub fn complete(&mut self, generation: u64) {
        if self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == generation)
        {
            self.in_flight = None;
        }
    }

    pub fn has_outstanding(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn outstanding_event(&self) -> Option<BlogStateEvent> {
        self.in_flight.as_ref().map(|in_flight| in_flight.event)
    }

    fn advance(&mut self) -> Option<InFlight> {
        self.generation += 1;
        self.in_flight.take()
    }
}

impl Drop for CancellationCoordinator {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
    }
}

async fn forward(
    generation: u64,
    event: BlogStateEvent,
    mut stream: DataStream,
    sender: mpsc::UnboundedSender<QueryMessage>,
) {
    while let Some(state) = stream.next().await {
        let message = QueryMessage {
            generation,
            event,
            payload: Payload::State(state),
        };
        if sender.send(message).is_err() {
            // Controller is gone.
            return;
        }
    }

    let _ = sender.send(QueryMessage {
        generation,
        event,
        payload: Payload::Completed,
    });
}
