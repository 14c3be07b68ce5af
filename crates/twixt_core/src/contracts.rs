//! Contract-based validation for TwixT moves.
//!
//! Contracts formalise Hoare-style reasoning: {P} action {Q}.

use crate::action::{Move, MoveError};
use crate::board::{Board, NodeId};
use crate::game::GameState;
use crate::invariants::{InvariantSet, TwixtInvariants, ownership_preserved};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the node is an empty grid cell.
pub struct NodeIsVacant;

impl NodeIsVacant {
    /// Rejects goal nodes and occupied cells.
    pub fn check(board: &Board, node: NodeId) -> Result<(), MoveError> {
        if node.is_goal() {
            Err(MoveError::GoalNode(node))
        } else if board.owner(node).is_some() {
            Err(MoveError::NodeOccupied(node))
        } else {
            Ok(())
        }
    }
}

/// Precondition: nobody has won yet.
pub struct GameNotOver;

impl GameNotOver {
    /// Rejects moves once a winner is recorded.
    pub fn check(game: &GameState) -> Result<(), MoveError> {
        if game.winner().is_some() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the mover holds the turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects a move by anyone but the turn-holder.
    pub fn check(mov: &Move, game: &GameState) -> Result<(), MoveError> {
        match game.turn() {
            None => Err(MoveError::NoTurnHolder),
            Some(holder) if holder != mov.player => Err(MoveError::WrongPlayer(mov.player)),
            Some(_) => Ok(()),
        }
    }
}

/// Composite precondition for a peg placement.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameState) -> Result<(), MoveError> {
        GameNotOver::check(game)?;
        PlayersTurn::check(mov, game)?;
        NodeIsVacant::check(game.board(), mov.node)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for peg placements.
///
/// Preconditions:
/// - No winner yet
/// - Mover holds the turn
/// - Target is an empty grid cell
///
/// Postconditions:
/// - No owned node changed hands or was cleared
/// - All [`TwixtInvariants`] hold
pub struct MoveContract;

impl Contract<GameState, Move> for MoveContract {
    fn pre(game: &GameState, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, game)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), MoveError> {
        if !ownership_preserved(before.board(), after.board()) {
            warn!("Owned node changed hands");
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: owned node changed hands".to_string(),
            ));
        }
        TwixtInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
