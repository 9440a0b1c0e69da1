//! Outbound message payloads.

use bytes::Bytes;

/// A payload deliverable to a connection: UTF-8 text or opaque binary.
///
/// Framing and serialization happen upstream; the gateway treats a payload as
/// ready-to-send bytes and never inspects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessagePayload {
    /// UTF-8 text frame.
    Text(String),
    /// Binary frame.
    Binary(Bytes),
}

impl MessagePayload {
    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for MessagePayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessagePayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Bytes> for MessagePayload {
    fn from(bytes: Bytes) -> Self {
        Self::Binary(bytes)
    }
}

impl From<Vec<u8>> for MessagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(bytes))
    }
}
