//! Tungstenite-backed transport handles.
//!
//! The write half of each accepted socket is owned by a spawned write loop;
//! handles talk to it over an mpsc channel and receive per-frame
//! acknowledgments on oneshot channels, so a `send` resolves only once the
//! sink has accepted (or refused) the frame.

use async_trait::async_trait;
use futures::{Sink, SinkExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::debug;

use beacon_core::errors::TransportError;
use beacon_core::payload::MessagePayload;

use super::connection::ConnectionHandle;

/// Outbound frames queued ahead of the socket; bounds memory per connection.
const WRITE_QUEUE_DEPTH: usize = 64;

enum WriteCommand {
    Frame {
        message: Message,
        ack: oneshot::Sender<Result<(), TransportError>>,
    },
    Close,
}

/// Handle to a socket whose write half is owned by [`spawn_write_loop`].
///
/// Cloning is deliberately not provided: one handle per connection record.
pub struct WsConnectionHandle {
    tx: mpsc::Sender<WriteCommand>,
}

/// Spawn the write loop owning `sink` and return the handle the connection
/// record stores.
///
/// The loop drains commands in order, acknowledging each frame with the
/// sink's result. It exits when the handle is dropped or closed; a failed
/// write does not kill the loop — the caller decides what a delivery failure
/// means for the connection.
pub fn spawn_write_loop<S>(sink: S) -> WsConnectionHandle
where
    S: Sink<Message, Error = WsError> + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(WRITE_QUEUE_DEPTH);
    let _task = tokio::spawn(write_loop(sink, rx));
    WsConnectionHandle { tx }
}

async fn write_loop<S>(mut sink: S, mut rx: mpsc::Receiver<WriteCommand>)
where
    S: Sink<Message, Error = WsError> + Send + Unpin,
{
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WriteCommand::Frame { message, ack } => {
                let result = sink
                    .send(message)
                    .await
                    .map_err(|e| TransportError::WebSocket(Box::new(e)));
                // Receiver gone means the sender timed out or was cancelled;
                // the write still completed against the sink.
                let _ = ack.send(result);
            }
            WriteCommand::Close => break,
        }
    }
    let _ = sink.close().await;
    debug!("write loop exited");
}

fn to_message(payload: MessagePayload) -> Message {
    match payload {
        MessagePayload::Text(text) => Message::Text(text.into()),
        MessagePayload::Binary(bytes) => Message::Binary(bytes),
    }
}

#[async_trait]
impl ConnectionHandle for WsConnectionHandle {
    async fn send(&self, payload: MessagePayload) -> Result<(), TransportError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(WriteCommand::Frame {
                message: to_message(payload),
                ack,
            })
            .await
            .map_err(|_| TransportError::Closed)?;
        done.await.map_err(|_| TransportError::Closed)?
    }

    async fn close(&self) {
        let _ = self.tx.send(WriteCommand::Close).await;
    }
}
