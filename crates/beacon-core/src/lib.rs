//! # beacon-core
//!
//! Foundation types for the Beacon realtime subscription gateway.
//!
//! This crate provides the shared vocabulary the gateway crates depend on:
//!
//! - **Branded IDs**: [`ids::ConnectionId`] newtype over the external connection key
//! - **Errors**: [`errors::ConnectionError`] / [`errors::TransportError`] via `thiserror`
//! - **Payloads**: [`payload::MessagePayload`] text-or-binary outbound frames
//! - **Logging**: [`logging::init`] tracing bootstrap
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `beacon-gateway`.

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;
pub mod payload;
