//! Client representation
//!
//! `Client` models one connected WebSocket and holds the sending side of
//! the per-connection channel drained by the writer task. `subscriptions`
//! maps the operation ids the client chose to the tokens of its live
//! streams, so `complete` and disconnects can end them.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::transport::message::ServerMessage;

#[derive(Debug)]
pub struct Client {
    pub id: String,
    pub sender: UnboundedSender<WsMessage>,
    pub subscriptions: HashMap<String, CancellationToken>,
}

impl Client {
    /// Create a new client with a sender channel. The `id` is a UUID used
    /// to identify the connection in logs.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            subscriptions: HashMap::new(),
        }
    }

    /// Queue `msg` for the writer task. Returns `false` once the connection is gone.
    pub fn send(&self, msg: &ServerMessage) -> bool {
        send_frame(&self.sender, msg)
    }

    /// Whether `op_id` names a subscription that is still running.
    pub fn is_active(&self, op_id: &str) -> bool {
        self.subscriptions
            .get(op_id)
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Remember a running subscription. Ids of ended subscriptions can be reused.
    pub fn track(&mut self, op_id: String, token: CancellationToken) -> bool {
        if self.is_active(&op_id) {
            return false;
        }
        self.subscriptions.retain(|_, t| !t.is_cancelled());
        self.subscriptions.insert(op_id, token);
        true
    }

    /// Cancel the subscription `op_id`. Returns `false` if it was not running.
    pub fn complete(&mut self, op_id: &str) -> bool {
        match self.subscriptions.remove(op_id) {
            Some(token) => {
                let was_active = !token.is_cancelled();
                token.cancel();
                was_active
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.subscriptions.drain() {
            token.cancel();
        }
    }
}

/// Serialize `msg` as a text frame and queue it on `sender`.
pub fn send_frame(sender: &UnboundedSender<WsMessage>, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(text) => sender.send(WsMessage::text(text)).is_ok(),
        Err(e) => {
            warn!("Failed to serialize server message: {e}");
            false
        }
    }
}
