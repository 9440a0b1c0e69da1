//! Connection records, metadata, and the transport-handle seam.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use beacon_core::errors::TransportError;
use beacon_core::ids::ConnectionId;
use beacon_core::payload::MessagePayload;

/// Write half of a live bidirectional socket.
///
/// `send` resolves once the transport has accepted the frame, mirroring a
/// callback-acknowledged write. One handle exists per record; it is shared
/// only through the record's `Arc`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionHandle: Send + Sync {
    /// Write one payload, resolving when the transport acknowledges it.
    async fn send(&self, payload: MessagePayload) -> Result<(), TransportError>;

    /// Ask the transport to shut down.
    ///
    /// Callers that hit a not-found on `hydrate` use this to terminate the
    /// orphaned socket, since registry and transport state have diverged.
    async fn close(&self);
}

/// Per-connection metadata attached at registration and negotiated later.
///
/// `extra` is the extension point for collaborator-attached fields this crate
/// does not interpret.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    /// Originating transport endpoint (e.g. `wss://gateway.example`).
    pub endpoint: String,
    /// Legacy-framing mode. Sticky: once set by negotiation, never cleared
    /// within the record's lifetime.
    #[serde(default)]
    pub use_legacy_protocol: bool,
    /// Collaborator-attached metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, Value>,
}

/// Socket-opened occurrence reported by the accepting collaborator.
pub struct ConnectEvent {
    /// Id assigned to the new connection.
    pub connection_id: ConnectionId,
    /// Originating transport endpoint.
    pub endpoint: String,
    /// Write half of the accepted socket.
    pub handle: Arc<dyn ConnectionHandle>,
}

/// A tracked logical endpoint of the realtime transport.
///
/// Records are immutable once stored: the legacy-protocol upgrade builds a
/// new record and swaps it into the registry rather than mutating in place,
/// so readers never observe a half-updated entry.
pub struct Connection {
    /// Registry key, unique per open connection.
    pub id: ConnectionId,
    /// Live write half of the socket. Preserved across the legacy upgrade.
    pub handle: Arc<dyn ConnectionHandle>,
    /// Metadata bag.
    pub data: ConnectionData,
    /// ISO 8601 time the record was created.
    pub connected_at: String,
}

impl Connection {
    pub(crate) fn from_event(event: ConnectEvent) -> Self {
        Self {
            id: event.connection_id,
            handle: event.handle,
            data: ConnectionData {
                endpoint: event.endpoint,
                ..ConnectionData::default()
            },
            connected_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Copy of this record with the legacy flag forced on. Same id, same
    /// handle, same registration time.
    pub(crate) fn with_legacy_protocol(&self) -> Self {
        Self {
            id: self.id.clone(),
            handle: Arc::clone(&self.handle),
            data: ConnectionData {
                use_legacy_protocol: true,
                ..self.data.clone()
            },
            connected_at: self.connected_at.clone(),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_handle() -> Arc<dyn ConnectionHandle> {
        Arc::new(MockConnectionHandle::new())
    }

    #[test]
    fn from_event_defaults_to_current_protocol() {
        let conn = Connection::from_event(ConnectEvent {
            connection_id: ConnectionId::from("c1"),
            endpoint: "wss://x".into(),
            handle: stub_handle(),
        });
        assert_eq!(conn.id, ConnectionId::from("c1"));
        assert_eq!(conn.data.endpoint, "wss://x");
        assert!(!conn.data.use_legacy_protocol);
        assert!(conn.data.extra.is_empty());
    }

    #[test]
    fn legacy_upgrade_preserves_everything_else() {
        let mut conn = Connection::from_event(ConnectEvent {
            connection_id: ConnectionId::from("c1"),
            endpoint: "wss://x".into(),
            handle: stub_handle(),
        });
        let _ = conn
            .data
            .extra
            .insert("tenant".into(), serde_json::json!("acme"));

        let upgraded = conn.with_legacy_protocol();
        assert!(upgraded.data.use_legacy_protocol);
        assert_eq!(upgraded.id, conn.id);
        assert_eq!(upgraded.data.endpoint, conn.data.endpoint);
        assert_eq!(upgraded.data.extra, conn.data.extra);
        assert_eq!(upgraded.connected_at, conn.connected_at);
        assert!(Arc::ptr_eq(&upgraded.handle, &conn.handle));
    }

    #[test]
    fn data_serializes_camel_case() {
        let data = ConnectionData {
            endpoint: "wss://x".into(),
            use_legacy_protocol: true,
            extra: serde_json::Map::new(),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["endpoint"], "wss://x");
        assert_eq!(json["useLegacyProtocol"], true);
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn debug_omits_handle() {
        let conn = Connection::from_event(ConnectEvent {
            connection_id: ConnectionId::from("c1"),
            endpoint: "wss://x".into(),
            handle: stub_handle(),
        });
        let rendered = format!("{conn:?}");
        assert!(rendered.contains("c1"));
        assert!(!rendered.contains("handle"));
    }
}
