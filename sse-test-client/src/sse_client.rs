use anyhow::Result;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Link {
    pub url: String,
    pub timestamp: Instant,
}

pub struct Connection {
    pub label: String,
    link_rx: mpsc::UnboundedReceiver<Link>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    pub fn establish(base_url: &str, label: String) -> Result<Self> {
        let url = format!("{}/events", base_url.trim_end_matches('/'));
        let (tx, rx) = mpsc::unbounded_channel();

        let client = es::ClientBuilder::for_url(&url)?.build();

        let task_label = label.clone();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => {
                        let link = Link {
                            url: event.data,
                            timestamp: Instant::now(),
                        };

                        if tx.send(link).is_err() {
                            debug!("Link receiver dropped for {}", task_label);
                            break;
                        }
                    }
                    Some(Ok(es::SSE::Comment(_))) => {
                        // Ignore comments (keep-alive)
                    }
                    Some(Err(e)) => {
                        warn!("SSE error for {}: {}", task_label, e);
                    }
                    None => {
                        debug!("SSE stream ended for {}", task_label);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            label,
            link_rx: rx,
            _handle: handle,
        })
    }

    /// Next link, or an error if none arrives before `timeout`.
    pub async fn next_link(&mut self, timeout: Duration) -> Result<Link> {
        match tokio::time::timeout(timeout, self.link_rx.recv()).await {
            Ok(Some(link)) => Ok(link),
            Ok(None) => anyhow::bail!("SSE connection closed"),
            Err(_) => anyhow::bail!("Timeout waiting for a link on {}", self.label),
        }
    }

    /// Next link with no deadline. Returns `None` once the stream has ended.
    pub async fn wait_for_link(&mut self) -> Option<Link> {
        self.link_rx.recv().await
    }
}
