use crate::Manager;
use async_trait::async_trait;
use events::{EventHandler, InboundEvent, MediaRef};
use log::*;
use messaging::{extract_links, MediaDownloader, QrDecoder};
use std::sync::Arc;

/// Handles inbound chat events by publishing every link they carry to the hub.
///
/// Message text is scanned directly. Images are downloaded, decoded as a QR
/// code, and the decoded payload is scanned the same way. Any failure along
/// the image path is logged and that image is skipped.
pub struct LinkRelayHandler {
    sse_manager: Arc<Manager>,
    downloader: Arc<dyn MediaDownloader>,
    decoder: Arc<dyn QrDecoder>,
}

impl LinkRelayHandler {
    pub fn new(
        sse_manager: Arc<Manager>,
        downloader: Arc<dyn MediaDownloader>,
        decoder: Arc<dyn QrDecoder>,
    ) -> Self {
        Self {
            sse_manager,
            downloader,
            decoder,
        }
    }

    /// Publish each link found in `text`, in order.
    fn publish_links(&self, text: &str) -> usize {
        let links = extract_links(text);
        for link in &links {
            self.sse_manager.publish(*link);
        }
        links.len()
    }

    async fn decode_image(&self, media: &MediaRef) -> messaging::error::Result<String> {
        let bytes = self.downloader.download(media).await?;
        self.decoder.decode(&bytes)
    }
}

#[async_trait]
impl EventHandler for LinkRelayHandler {
    async fn handle(&self, event: &InboundEvent) {
        match event {
            InboundEvent::MessageReceived { .. } => {
                if let Some(text) = event.message_text() {
                    let count = self.publish_links(text);
                    debug!("Published {count} link(s) from chat message");
                }
            }

            InboundEvent::ImageReceived { media } => match self.decode_image(media).await {
                Ok(payload) => {
                    let count = self.publish_links(&payload);
                    debug!("Published {count} link(s) from QR code in {media}");
                }
                Err(e) => warn!("Skipping image {media}: {e}"),
            },

            InboundEvent::Other { kind } => {
                trace!("Ignoring inbound event of kind {kind}");
            }
        }
    }
}
