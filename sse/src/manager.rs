use crate::connection::{ConnectionId, ConnectionRegistry};
use crate::message::Message;
use crate::session::Subscription;
use log::*;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Default number of messages buffered per subscriber.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// What `publish` does with a subscriber whose queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlowSubscriberPolicy {
    /// Skip this message for the stalled subscriber and keep it connected.
    #[default]
    DropMessage,
    /// Evict the stalled subscriber; its stream ends once the queue drains.
    Disconnect,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SlowSubscriberPolicyParseError;

impl FromStr for SlowSubscriberPolicy {
    type Err = SlowSubscriberPolicyParseError;
    fn from_str(policy: &str) -> Result<SlowSubscriberPolicy, Self::Err> {
        match policy.to_lowercase().as_str() {
            "drop-message" => Ok(SlowSubscriberPolicy::DropMessage),
            "disconnect" => Ok(SlowSubscriberPolicy::Disconnect),
            _ => Err(SlowSubscriberPolicyParseError),
        }
    }
}

impl fmt::Display for SlowSubscriberPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SlowSubscriberPolicy::DropMessage => write!(f, "drop-message"),
            SlowSubscriberPolicy::Disconnect => write!(f, "disconnect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    channel_capacity: usize,
    policy: SlowSubscriberPolicy,
}

impl HubConfig {
    /// A capacity of zero is raised to one; every subscriber can hold at
    /// least one pending message.
    pub fn new(channel_capacity: usize, policy: SlowSubscriberPolicy) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
            policy,
        }
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn policy(&self) -> SlowSubscriberPolicy {
        self.policy
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY, SlowSubscriberPolicy::default())
    }
}

/// Outcome of one `publish` call, for logging and tests. Producers are free to
/// ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers that had the message queued.
    pub delivered: usize,
    /// Stalled subscribers that skipped the message but stay connected.
    pub dropped: usize,
    /// Subscribers removed during this call, either closed or evicted as stalled.
    pub disconnected: usize,
}

/// The broadcast hub. Owns the connection registry and fans each published
/// message out to every live subscriber without ever waiting on one.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    config: HubConfig,
}

impl Manager {
    pub fn new(config: HubConfig) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            config,
        }
    }

    /// Register a new connection. The returned subscription deregisters
    /// itself when dropped.
    pub fn register_connection(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let connection_id = self.registry.register(tx);
        info!(
            "Registered new SSE connection {} ({} active)",
            connection_id.as_str(),
            self.registry.len()
        );
        Subscription::new(connection_id, rx, Arc::clone(&self.registry))
    }

    /// Unregister a connection by ID. Calling this for a connection that is
    /// already gone does nothing.
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if self.registry.unregister(connection_id) {
            info!("Unregistered SSE connection {}", connection_id.as_str());
        }
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Deliver `message` to every connection registered at the time of the
    /// call. Each subscriber gets a single non-blocking enqueue attempt; a full
    /// or closed queue only affects that subscriber.
    pub fn publish(&self, message: impl Into<Message>) -> DeliveryReport {
        let message = message.into();
        let mut report = DeliveryReport::default();

        for (connection_id, sender) in self.registry.snapshot() {
            match sender.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => match self.config.policy {
                    SlowSubscriberPolicy::DropMessage => {
                        warn!(
                            "SSE connection {} is not keeping up, dropping message",
                            connection_id.as_str()
                        );
                        report.dropped += 1;
                    }
                    SlowSubscriberPolicy::Disconnect => {
                        warn!(
                            "SSE connection {} is not keeping up, disconnecting it",
                            connection_id.as_str()
                        );
                        self.registry.unregister(&connection_id);
                        report.disconnected += 1;
                    }
                },
                Err(TrySendError::Closed(_)) => {
                    warn!(
                        "Failed to send message to SSE connection {}: connection closed. Removing it.",
                        connection_id.as_str()
                    );
                    self.registry.unregister(&connection_id);
                    report.disconnected += 1;
                }
            }
        }

        debug!("Published {message}: {report:?}");
        report
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(capacity: usize, policy: SlowSubscriberPolicy) -> Manager {
        Manager::new(HubConfig::new(capacity, policy))
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        assert_eq!(
            HubConfig::new(0, SlowSubscriberPolicy::DropMessage).channel_capacity(),
            1
        );
    }

    #[test]
    fn test_policy_round_trips_through_its_flag_value() {
        for policy in [
            SlowSubscriberPolicy::DropMessage,
            SlowSubscriberPolicy::Disconnect,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
        assert_eq!(
            "block".parse::<SlowSubscriberPolicy>(),
            Err(SlowSubscriberPolicyParseError)
        );
    }

    #[test]
    fn test_publish_with_no_subscribers_is_a_no_op() {
        let manager = Manager::default();
        assert_eq!(
            manager.publish("https://example.com"),
            DeliveryReport::default()
        );
    }

    #[test]
    fn test_dropping_subscription_unregisters_it() {
        let manager = Manager::default();
        let subscription = manager.register_connection();
        assert_eq!(manager.connection_count(), 1);

        drop(subscription);

        assert_eq!(manager.connection_count(), 0);
    }

    #[test]
    fn test_unregister_connection_is_idempotent() {
        let manager = Manager::default();
        let subscription = manager.register_connection();
        let connection_id = subscription.connection_id().clone();

        manager.unregister_connection(&connection_id);
        manager.unregister_connection(&connection_id);
        drop(subscription);

        assert_eq!(manager.connection_count(), 0);
    }

    #[test]
    fn test_full_queue_drops_message_but_keeps_subscriber() {
        let manager = manager(1, SlowSubscriberPolicy::DropMessage);
        let mut subscription = manager.register_connection();

        assert_eq!(manager.publish("https://example.com/1").delivered, 1);
        let report = manager.publish("https://example.com/2");

        assert_eq!(report.dropped, 1);
        assert_eq!(manager.connection_count(), 1);
        assert_eq!(
            subscription.try_recv().map(|m| m.to_string()),
            Some("https://example.com/1".to_string())
        );
        assert_eq!(subscription.try_recv(), None);
    }

    #[tokio::test]
    async fn test_full_queue_disconnects_subscriber_under_disconnect_policy() {
        let manager = manager(1, SlowSubscriberPolicy::Disconnect);
        let mut subscription = manager.register_connection();

        manager.publish("https://example.com/1");
        let report = manager.publish("https://example.com/2");

        assert_eq!(report.disconnected, 1);
        assert_eq!(manager.connection_count(), 0);
        // The queued message is still delivered, then the stream ends.
        assert_eq!(
            subscription.recv().await,
            Some(Message::from("https://example.com/1"))
        );
        assert_eq!(subscription.recv().await, None);
    }
}
