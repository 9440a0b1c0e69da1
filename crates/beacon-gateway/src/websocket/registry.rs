//! Id → connection store: lifecycle, lookup & negotiation, delivery.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use metrics::{counter, gauge};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use beacon_core::errors::ConnectionError;
use beacon_core::ids::ConnectionId;
use beacon_core::payload::MessagePayload;

use super::connection::{ConnectEvent, Connection};
use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL,
    WS_LEGACY_UPGRADES_TOTAL, WS_SEND_ERRORS_TOTAL,
};

/// Registry contract the gateway's collaborators program against.
///
/// Event handlers call [`register`](Self::register) /
/// [`unregister`](Self::unregister) on socket open/close; dispatch re-resolves
/// a connection with [`hydrate`](Self::hydrate) before every
/// [`send_to_connection`](Self::send_to_connection).
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Track a newly opened connection and return its record.
    ///
    /// Always succeeds. Registering an id that is already live replaces the
    /// old record (last-writer-wins): an in-flight send on the old record
    /// finishes against the old handle and never touches the store.
    async fn register(&self, event: ConnectEvent) -> Arc<Connection>;

    /// Drop the entry for `id` if present. Idempotent: removing an unknown id
    /// is a no-op, so cleanup paths are safely callable more than once.
    async fn unregister(&self, id: &ConnectionId);

    /// Re-resolve a connection by id, optionally switching it to legacy
    /// framing.
    ///
    /// Fails with [`ConnectionError::NotFound`] when the id has no entry —
    /// the signal that registry and transport state have diverged and the
    /// socket should be terminated. When `use_legacy_protocol` is requested
    /// and not yet set, the stored record is replaced with an upgraded copy
    /// before returning; the flag is sticky for the record's lifetime.
    async fn hydrate(
        &self,
        id: &ConnectionId,
        use_legacy_protocol: bool,
    ) -> Result<Arc<Connection>, ConnectionError>;

    /// Deliver one payload on the connection's transport handle.
    ///
    /// Failure surfaces as [`ConnectionError::Send`] carrying the transport
    /// error; the registry is never touched here, so the caller decides
    /// whether a failed send means retry, unregister, or both.
    async fn send_to_connection(
        &self,
        connection: &Connection,
        payload: MessagePayload,
    ) -> Result<(), ConnectionError>;

    /// Number of live connections. Never takes the store lock.
    fn connection_count(&self) -> usize;
}

/// In-memory, single-process [`ConnectionManager`].
///
/// One instance per gateway; state lives and dies with the process.
pub struct WsConnectionManager {
    /// Live connections indexed by id.
    connections: RwLock<HashMap<ConnectionId, Arc<Connection>>>,
    /// Atomic counter tracking live connections (avoids read-locking for
    /// count queries).
    active_count: AtomicUsize,
}

impl WsConnectionManager {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
        }
    }
}

impl Default for WsConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for WsConnectionManager {
    async fn register(&self, event: ConnectEvent) -> Arc<Connection> {
        let connection = Arc::new(Connection::from_event(event));
        let mut conns = self.connections.write().await;
        if conns
            .insert(connection.id.clone(), Arc::clone(&connection))
            .is_none()
        {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
            gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);
        }
        counter!(WS_CONNECTIONS_TOTAL).increment(1);
        debug!(conn_id = %connection.id, endpoint = %connection.data.endpoint, "connection registered");
        connection
    }

    async fn unregister(&self, id: &ConnectionId) {
        let mut conns = self.connections.write().await;
        if conns.remove(id).is_some() {
            let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
            gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
            counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
            debug!(conn_id = %id, "connection unregistered");
        }
    }

    async fn hydrate(
        &self,
        id: &ConnectionId,
        use_legacy_protocol: bool,
    ) -> Result<Arc<Connection>, ConnectionError> {
        // Lookup, flag check, and replacement form one critical section so an
        // unregister cannot slip between them.
        let mut conns = self.connections.write().await;
        let Some(existing) = conns.get(id) else {
            return Err(ConnectionError::NotFound(id.clone()));
        };
        if use_legacy_protocol && !existing.data.use_legacy_protocol {
            let upgraded = Arc::new(existing.with_legacy_protocol());
            let _ = conns.insert(id.clone(), Arc::clone(&upgraded));
            counter!(WS_LEGACY_UPGRADES_TOTAL).increment(1);
            debug!(conn_id = %id, "connection switched to legacy framing");
            return Ok(upgraded);
        }
        Ok(Arc::clone(existing))
    }

    async fn send_to_connection(
        &self,
        connection: &Connection,
        payload: MessagePayload,
    ) -> Result<(), ConnectionError> {
        match connection.handle.send(payload).await {
            Ok(()) => Ok(()),
            Err(source) => {
                counter!(WS_SEND_ERRORS_TOTAL).increment(1);
                warn!(conn_id = %connection.id, error = %source, "failed to deliver payload");
                Err(ConnectionError::Send {
                    id: connection.id.clone(),
                    source,
                })
            }
        }
    }

    fn connection_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}
