//! Inbound event infrastructure for linkcast.
//!
//! The messaging-account client delivers many kinds of events through a single
//! callback. This crate turns that callback into a tagged enum and a handler
//! trait, so the client never needs to know what consumes its events.
//!
//! # Architecture
//!
//! - **InboundEvent**: Enum of everything the messaging client can report
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Dispatches events to registered handlers
//!
//! This crate has no dependencies on internal crates, so both the client side
//! (`messaging`) and the consumer side (`sse`) can depend on it.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Opaque reference to a media attachment. The messaging client that emitted
/// the event knows how to turn it into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Events reported by the messaging-account client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A chat message arrived. Plain messages carry `conversation`; replies,
    /// quotes and link previews carry `extended_text` instead.
    MessageReceived {
        conversation: Option<String>,
        extended_text: Option<String>,
    },
    /// An image arrived. The image may contain a QR code.
    ImageReceived { media: MediaRef },
    /// Anything else the client reports (receipts, presence, connection state).
    Other { kind: String },
}

impl InboundEvent {
    /// Text of a received message. `conversation` wins, and `extended_text`
    /// is used only when `conversation` is absent or empty.
    pub fn message_text(&self) -> Option<&str> {
        match self {
            InboundEvent::MessageReceived {
                conversation,
                extended_text,
            } => conversation
                .as_deref()
                .filter(|text| !text.is_empty())
                .or(extended_text.as_deref()),
            _ => None,
        }
    }
}

/// Trait for handling inbound events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &InboundEvent);
}

/// Publishes inbound events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers, one after another.
    pub async fn publish(&self, event: InboundEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<InboundEvent>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &InboundEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    fn message(conversation: Option<&str>, extended_text: Option<&str>) -> InboundEvent {
        InboundEvent::MessageReceived {
            conversation: conversation.map(String::from),
            extended_text: extended_text.map(String::from),
        }
    }

    #[test]
    fn test_message_text_prefers_conversation() {
        let event = message(Some("plain"), Some("extended"));
        assert_eq!(event.message_text(), Some("plain"));
    }

    #[test]
    fn test_message_text_falls_back_to_extended_text_when_conversation_is_empty() {
        assert_eq!(message(Some(""), Some("extended")).message_text(), Some("extended"));
        assert_eq!(message(None, Some("extended")).message_text(), Some("extended"));
    }

    #[test]
    fn test_message_text_is_none_for_other_events() {
        let image = InboundEvent::ImageReceived {
            media: MediaRef::new("qr.png"),
        };
        assert_eq!(image.message_text(), None);
        assert_eq!(message(None, None).message_text(), None);
    }

    #[tokio::test]
    async fn test_publisher_calls_every_handler_in_order() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        publisher
            .publish(InboundEvent::Other {
                kind: "receipt".to_string(),
            })
            .await;

        assert_eq!(first.seen.lock().unwrap().len(), 1);
        assert_eq!(second.seen.lock().unwrap().len(), 1);
    }
}
