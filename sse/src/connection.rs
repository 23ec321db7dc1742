use crate::message::Message;
use dashmap::DashMap;
use tokio::sync::mpsc::Sender;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The hub-side end of one subscriber's bounded delivery queue.
pub type Endpoint = Sender<Message>;

/// Set of live subscriber endpoints.
///
/// Presence in the registry means the connection is live. Every access goes
/// through `DashMap`'s shard locks, and fan-out works on a copied snapshot so
/// no lock is held while messages are handed to subscribers.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Endpoint>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection - O(1)
    pub fn register(&self, sender: Endpoint) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.connections.insert(connection_id.clone(), sender);
        connection_id
    }

    /// Unregister a connection - O(1). Returns `false` when the connection was
    /// already gone, so repeated calls are harmless.
    pub fn unregister(&self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id).is_some()
    }

    #[cfg(test)]
    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// Copy of the current membership for fan-out - O(n)
    pub fn snapshot(&self) -> Vec<(ConnectionId, Endpoint)> {
        self.connections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn test_register_adds_endpoint_to_snapshot() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(1);

        let connection_id = registry.register(tx);

        assert!(registry.contains(&connection_id));
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, connection_id);
    }

    #[test]
    fn test_unregister_twice_is_a_no_op() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(1);
        let connection_id = registry.register(tx);

        assert!(registry.unregister(&connection_id));
        assert!(!registry.unregister(&connection_id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_registration() {
        let registry = ConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::channel(1);
        registry.register(tx1);

        let snapshot = registry.snapshot();
        let (tx2, _rx2) = mpsc::channel(1);
        registry.register(tx2);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
