//! Messaging-account client abstraction.

use crate::error::{Error, Result};
use async_trait::async_trait;
use events::{EventPublisher, InboundEvent, MediaRef};
use log::*;
use std::io::{BufRead, BufReader};
use std::sync::Mutex;
use std::thread;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Lines read ahead of the relay task.
const LINE_BUFFER: usize = 16;

/// Fetches the bytes behind a media attachment.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>>;
}

/// A chat-account session that reports its activity as [`InboundEvent`]s.
///
/// Implementations own their session state. The binary constructs one,
/// connects it with the publisher that feeds the hub, and disconnects it on
/// shutdown.
#[async_trait]
pub trait MessagingClient: MediaDownloader {
    /// Whether a stored session exists. A client without one is never connected.
    fn is_logged_in(&self) -> bool;

    /// Start delivering events to `publisher`. Returns once the client is
    /// connected; events then flow from a background task.
    async fn connect(&self, publisher: EventPublisher) -> Result<()>;

    /// Stop delivering events and close the session.
    async fn disconnect(&self);
}

/// Messaging client fed from standard input, one chat message per line.
///
/// - A plain line is a text message.
/// - `/image <path> [caption]` is an image message whose media is a local file,
///   optionally followed by caption text.
/// - Any other `/command` is reported as [`InboundEvent::Other`].
///
/// Input is read on a dedicated OS thread. A blocked read never holds up
/// runtime shutdown; after `disconnect` the thread exits on its next line.
pub struct ConsoleClient {
    input: Mutex<Option<Box<dyn BufRead + Send>>>,
    relay: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleClient {
    pub fn new() -> Self {
        Self::with_input(BufReader::new(std::io::stdin()))
    }

    /// Client reading chat lines from `input` instead of stdin.
    pub fn with_input(input: impl BufRead + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Some(Box::new(input))),
            relay: Mutex::new(None),
        }
    }

    /// Events described by one input line, in the order they should be handled.
    pub fn parse_line(line: &str) -> Vec<InboundEvent> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let Some(command) = line.strip_prefix('/') else {
            return vec![text_message(line)];
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((command, ""));

        match name {
            "image" if !rest.is_empty() => {
                let (path, caption) = rest
                    .split_once(char::is_whitespace)
                    .map(|(path, caption)| (path, caption.trim()))
                    .unwrap_or((rest, ""));

                let mut events = Vec::with_capacity(2);
                if !caption.is_empty() {
                    events.push(InboundEvent::MessageReceived {
                        conversation: None,
                        extended_text: Some(caption.to_string()),
                    });
                }
                events.push(InboundEvent::ImageReceived {
                    media: MediaRef::new(path),
                });
                events
            }
            _ => vec![InboundEvent::Other {
                kind: name.to_string(),
            }],
        }
    }
}

impl Default for ConsoleClient {
    fn default() -> Self {
        Self::new()
    }
}

fn text_message(text: &str) -> InboundEvent {
    InboundEvent::MessageReceived {
        conversation: Some(text.to_string()),
        extended_text: None,
    }
}

#[async_trait]
impl MediaDownloader for ConsoleClient {
    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>> {
        tokio::fs::read(media.as_str())
            .await
            .map_err(|e| Error::Download(format!("{media}: {e}")))
    }
}

#[async_trait]
impl MessagingClient for ConsoleClient {
    fn is_logged_in(&self) -> bool {
        true
    }

    async fn connect(&self, publisher: EventPublisher) -> Result<()> {
        let input = self
            .input
            .lock()
            .map_err(|_| Error::Connection("console input lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| Error::Connection("already connected".to_string()))?;

        let (tx, mut rx) = mpsc::channel::<String>(LINE_BUFFER);

        thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || {
                for line in input.lines() {
                    match line {
                        Ok(line) => {
                            if tx.blocking_send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Failed to read console input: {e}");
                            break;
                        }
                    }
                }
            })
            .map_err(|e| Error::Connection(format!("failed to start console reader: {e}")))?;

        let relay = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                for event in ConsoleClient::parse_line(&line) {
                    publisher.publish(event).await;
                }
            }
            info!("Console input closed, no further messages will be read");
        });

        if let Ok(mut slot) = self.relay.lock() {
            *slot = Some(relay);
        }
        info!("Console messaging client connected, reading messages from stdin");
        Ok(())
    }

    async fn disconnect(&self) {
        let relay = match self.relay.lock() {
            Ok(mut relay) => relay.take(),
            Err(_) => None,
        };

        if let Some(relay) = relay {
            relay.abort();
            info!("Console messaging client disconnected");
        }
    }
}
