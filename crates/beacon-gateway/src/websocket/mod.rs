//! WebSocket connection management and delivery.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `connection` | Connection records, metadata, the transport-handle seam |
//! | `registry` | Id → connection store: register, unregister, hydrate, send |
//! | `transport` | Tungstenite write loop with acknowledged sends |
//! | `protocol` | Subprotocol negotiation (current vs legacy framing) |
//!
//! ## Data Flow
//!
//! Accept loop → `register`. Dispatch re-resolves connections via `hydrate`
//! before every `send_to_connection`, which hands the payload to the
//! connection's `transport` write loop. Socket close → `unregister`.

pub mod connection;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use connection::{ConnectEvent, Connection, ConnectionData, ConnectionHandle};
pub use registry::{ConnectionManager, WsConnectionManager};
pub use transport::WsConnectionHandle;
