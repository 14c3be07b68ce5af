//! TwixT relay server.
//!
//! Hosts games from [`twixt_core`] for pairs of remote peers: a registry of
//! live sessions, a JSON protocol over WebSocket, and a few HTTP routes for
//! inspection.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod sweeper;

pub use config::ServerConfig;
pub use connection::{Connection, ConnectionId};
pub use error::{ConfigError, ErrorBody, ErrorKind, RelayError};
pub use protocol::{ClientMessage, GameOverReason, ServerEvent};
pub use registry::{GameId, HistoryEntry, Joined, Registry, TurnReceipt};
pub use server::{dispatch, router};
pub use sweeper::spawn_idle_sweeper;
