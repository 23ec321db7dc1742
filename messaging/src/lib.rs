//! Producer-side collaborators of the broadcast hub.
//!
//! This crate holds everything that turns a chat account's activity into
//! publishable text:
//! - A messaging-client abstraction that reports [`events::InboundEvent`]s and
//!   downloads media attachments
//! - Link extraction from message text
//! - QR-code decoding of image attachments
//!
//! The client is always constructed explicitly and handed to whoever needs it.
//! No process-wide client state exists.

pub mod client;
pub mod error;
pub mod links;
pub mod qr;

// Re-export commonly used types
pub use client::{ConsoleClient, MediaDownloader, MessagingClient};
pub use error::Error;
pub use links::extract_links;
pub use qr::{QrDecoder, RqrrDecoder};
