//! Messages exchanged with peers over the WebSocket.
//!
//! Frames are JSON objects tagged by a kebab-case `type` field.

use crate::error::{ErrorKind, RelayError};
use crate::registry::GameId;
use serde::{Deserialize, Serialize};
use twixt_core::{GameState, NodeId, ParticipantId, Player};

/// Message sent by a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Allocate a new game.
    CreateGame,
    /// Take (or reclaim) a seat in a game.
    JoinGame {
        /// Game to join.
        game_id: GameId,
        /// Identity of the joining participant.
        player_id: ParticipantId,
    },
    /// Finish a turn by submitting the locally computed snapshot.
    EndTurn {
        /// Game being played.
        game_id: GameId,
        /// Acting participant.
        player_id: ParticipantId,
        /// Snapshot after the peer's move.
        state: GameState,
    },
    /// Finish a turn by naming the node to place a peg on.
    PlacePeg {
        /// Game being played.
        game_id: GameId,
        /// Acting participant.
        player_id: ParticipantId,
        /// Grid node receiving the peg.
        node: NodeId,
    },
    /// Ask for the latest snapshot.
    Sync {
        /// Game to fetch.
        game_id: GameId,
    },
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverReason {
    /// The winner joined their goal edges.
    Connected,
    /// The loser let their turn time out.
    Forfeit,
}

/// Message pushed to a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A game was allocated.
    GameCreated {
        /// The new game's identifier.
        game_id: GameId,
    },
    /// The receiver holds a seat.
    Joined {
        /// Game joined.
        game_id: GameId,
        /// Seat assigned (0 or 1).
        seat: Player,
        /// Latest snapshot.
        state: GameState,
    },
    /// The other seat has been taken (or its holder reconnected).
    OpponentJoined {
        /// Game joined.
        game_id: GameId,
        /// Seat the opponent holds.
        seat: Player,
    },
    /// The opponent finished their turn.
    EndedTurn {
        /// Game being played.
        game_id: GameId,
        /// Snapshot after the opponent's move.
        state: GameState,
    },
    /// The receiver's turn was recorded.
    TurnAccepted {
        /// Game being played.
        game_id: GameId,
        /// Authoritative snapshot after the move.
        state: GameState,
    },
    /// Latest snapshot, in answer to `sync`.
    State {
        /// Game requested.
        game_id: GameId,
        /// Latest snapshot.
        state: GameState,
    },
    /// The game has a winner.
    GameOver {
        /// Game that ended.
        game_id: GameId,
        /// Winning player.
        winner: Player,
        /// How the game ended.
        reason: GameOverReason,
    },
    /// The last request was rejected.
    Error {
        /// Error category.
        kind: ErrorKind,
        /// Human-readable detail.
        message: String,
    },
}

impl From<&RelayError> for ServerEvent {
    fn from(err: &RelayError) -> Self {
        ServerEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
