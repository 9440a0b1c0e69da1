//! Error hierarchy for the connection gateway.

use crate::ids::ConnectionId;

/// Failure writing on a live transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The write side is gone: the socket is closed or closing, so the write
    /// could not even be handed to the transport.
    #[error("transport closed")]
    Closed,

    /// The transport accepted the write and then reported a failure.
    #[error("websocket write failed: {0}")]
    WebSocket(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors surfaced by the connection manager.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// No registry entry for the id. Registry and transport state have
    /// diverged; callers should treat the socket as orphaned and close it.
    #[error("connection {0} not found")]
    NotFound(ConnectionId),

    /// Delivery failed on the connection's transport handle.
    ///
    /// The registry entry is untouched. Whether to retry the send, unregister
    /// the connection, or both, is the caller's decision.
    #[error("send to connection {id} failed")]
    Send {
        /// Target connection.
        id: ConnectionId,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },
}
