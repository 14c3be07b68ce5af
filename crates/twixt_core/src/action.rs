//! First-class action types for TwixT.
//!
//! A move is a player placing one peg. Links follow from the placement and
//! are never chosen directly.

use crate::board::NodeId;
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// A peg placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The player placing the peg.
    pub player: Player,
    /// The grid node receiving the peg.
    pub node: NodeId,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node.position() {
            Some(pos) => write!(f, "{} -> {}", self.player, pos),
            None => write!(f, "{} -> node {}", self.player, self.node),
        }
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The node already holds a peg.
    #[display("node {} is already occupied", _0)]
    NodeOccupied(NodeId),

    /// Goal nodes cannot receive pegs.
    #[display("node {} is a goal node", _0)]
    GoalNode(NodeId),

    /// The game already has a winner.
    #[display("game is already over")]
    GameOver,

    /// It is not this player's turn.
    #[display("it is not {}'s turn", _0)]
    WrongPlayer(Player),

    /// No player holds the turn.
    #[display("no player holds the turn")]
    NoTurnHolder,

    /// A postcondition failed after applying the move.
    #[display("invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
