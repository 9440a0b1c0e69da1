//! Subprotocol negotiation for the subscription channel.
//!
//! Two framings are spoken: `graphql-transport-ws` (current) and `graphql-ws`
//! (the legacy subscriptions-transport-ws framing). The accepted offer from
//! the client's `Sec-WebSocket-Protocol` header decides the per-connection
//! legacy flag, which is sticky for the record's lifetime.

/// Current subscription protocol.
pub const GRAPHQL_TRANSPORT_WS: &str = "graphql-transport-ws";

/// Legacy protocol spoken by subscriptions-transport-ws clients.
pub const GRAPHQL_WS: &str = "graphql-ws";

/// Pick the subprotocol to echo in the upgrade response.
///
/// The offer list is comma-separated; the current protocol wins when both are
/// offered. `None` when the client offered neither.
#[must_use]
pub fn accepted_subprotocol(offer: &str) -> Option<&'static str> {
    let mut saw_legacy = false;
    for candidate in offer.split(',').map(str::trim) {
        if candidate.eq_ignore_ascii_case(GRAPHQL_TRANSPORT_WS) {
            return Some(GRAPHQL_TRANSPORT_WS);
        }
        if candidate.eq_ignore_ascii_case(GRAPHQL_WS) {
            saw_legacy = true;
        }
    }
    saw_legacy.then_some(GRAPHQL_WS)
}

/// Whether the client's offer selects legacy framing.
#[must_use]
pub fn is_legacy_subprotocol(offer: &str) -> bool {
    accepted_subprotocol(offer) == Some(GRAPHQL_WS)
}
