//! Outbound channel to one connected peer.

use crate::protocol::ServerEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

/// Identifier distinguishing successive connections of the same participant.
pub type ConnectionId = u64;

/// Sending half of a peer's event stream.
///
/// The WebSocket task owns the receiving half and forwards events to the
/// socket. Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    /// Opens a new channel, returning the connection and its event stream.
    pub fn open() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed);
        debug!(connection = id, "Opened connection channel");
        (Self { id, tx }, rx)
    }

    /// Connection identifier.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues an event. Returns `false` if the peer has gone away.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Whether the receiving half is still alive.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}
