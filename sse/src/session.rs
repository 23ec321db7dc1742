use crate::connection::{ConnectionId, ConnectionRegistry};
use crate::message::Message;
use async_stream::stream;
use futures::Stream;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;

/// Removes a connection from the registry when dropped.
///
/// Dropping the guard is how a session reaches CLOSED: a client disconnect or
/// failed write drops the response stream, the stream owns the guard, and the
/// guard deregisters. Unregistering is idempotent, so it does not matter if
/// the hub already evicted the connection.
struct Registration {
    connection_id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.registry.unregister(&self.connection_id) {
            info!(
                "Unregistered SSE connection {}",
                self.connection_id.as_str()
            );
        }
    }
}

/// One subscriber's side of the hub: its bounded queue plus the registration
/// that keeps it live.
pub struct Subscription {
    receiver: Receiver<Message>,
    registration: Registration,
}

impl Subscription {
    pub(crate) fn new(
        connection_id: ConnectionId,
        receiver: Receiver<Message>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            receiver,
            registration: Registration {
                connection_id,
                registry,
            },
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.registration.connection_id
    }

    /// Waits for the next message. Returns `None` once the hub has dropped
    /// this subscriber and its queue is drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }

    /// Turns the subscription into a stream of messages. The registration
    /// lives exactly as long as the stream.
    pub fn into_stream(mut self) -> impl Stream<Item = Message> + Send + 'static {
        stream! {
            while let Some(message) = self.receiver.recv().await {
                yield message;
            }

            debug!(
                "SSE connection {} evicted by the hub, closing stream",
                self.registration.connection_id.as_str()
            );
        }
    }
}
