//! Server-Sent Events (SSE) broadcast hub.
//!
//! This crate fans short text messages (links found in chat messages or QR
//! codes) out to every browser currently subscribed to the event stream.
//!
//! # Architecture
//!
//! - **Connection registry**: a `DashMap` of live subscriber endpoints keyed by
//!   server-generated `ConnectionId`s. Only the `Manager` holds it.
//! - **Bounded queues**: every subscriber gets its own bounded channel.
//!   Publishing is a single `try_send` per subscriber, so a stalled browser
//!   can never hold up the producer or any other subscriber.
//! - **Self-cleaning sessions**: a `Subscription` deregisters itself when
//!   dropped. Client disconnects, failed writes and hub evictions all go
//!   through that same path.
//! - **Ephemeral messages**: nothing is stored. A subscriber that connects
//!   after a message was published never sees it.
//!
//! # Message Flow
//!
//! 1. Browser opens `GET /events`; the web handler calls `register_connection`
//! 2. The messaging client reports an `InboundEvent`
//! 3. `LinkRelayHandler` extracts links (from text, or from a decoded QR code)
//! 4. Each link goes through `Manager::publish` to every registered subscriber
//! 5. The web layer writes it as `data: <link>\n\n` and flushes
//!
//! # Example: Publishing a link
//!
//! ```rust,ignore
//! app_state.sse_manager.publish("https://example.com/1");
//! ```
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and the type-safe ConnectionId
//! - `manager`: the hub (registration, publish, slow subscriber policy)
//! - `message`: the broadcast payload and its SSE event form
//! - `session`: the per-connection Subscription
//! - `inbound_event_handler`: bridge from messaging events to the hub

pub mod connection;
pub mod inbound_event_handler;
pub mod manager;
pub mod message;
pub mod session;

pub use manager::{DeliveryReport, HubConfig, Manager, SlowSubscriberPolicy};
pub use message::Message;
pub use session::Subscription;
