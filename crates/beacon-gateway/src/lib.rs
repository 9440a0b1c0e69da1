//! # beacon-gateway
//!
//! Connection-lifecycle registry for the Beacon realtime subscription channel.
//!
//! The gateway tracks which logical connections are open, carries
//! per-connection metadata (notably the negotiated protocol mode), and is the
//! single choke point through which outbound payloads reach a specific
//! connection. Socket accept/upgrade, message framing, and routing live in
//! the surrounding collaborators; they drive this crate through the
//! [`websocket::ConnectionManager`] contract.
//!
//! ## Crate Position
//!
//! Depends on `beacon-core` for IDs, errors, and payload types.

#![deny(unsafe_code)]

pub mod metrics;
pub mod websocket;
