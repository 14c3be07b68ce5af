//! TwixT game engine.
//!
//! Pure game logic with no I/O: the board graph, peg placement with
//! automatic knight's-move linking, crossing checks, win detection and the
//! two-seat session state machine.
//!
//! # Example
//!
//! ```
//! use twixt_core::{GameSession, NodeId, Phase, Player};
//!
//! let mut session = GameSession::new();
//! session.join("alice".into()).unwrap();
//! session.join("bob".into()).unwrap();
//! assert_eq!(session.phase(), Phase::InProgress);
//!
//! let node = NodeId::grid(2, 2).unwrap();
//! session.take_turn(&"alice".into(), node).unwrap();
//! assert_eq!(session.state().turn(), Some(Player::Red));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod contracts;
mod game;
mod player;
mod session;

pub mod invariants;
pub mod rules;

pub use action::{Move, MoveError};
pub use board::{
    BOARD_SIZE, Board, BoardShapeError, GRID_NODES, Goal, Link, NODE_COUNT, Node, NodeId,
    Position, UnknownNode,
};
pub use contracts::{Contract, GameNotOver, LegalMove, MoveContract, NodeIsVacant, PlayersTurn};
pub use game::{GameState, TurnOutcome};
pub use player::{Player, UnknownPlayer};
pub use session::{GameSession, ParticipantId, Phase, SessionError};
