//! Game state snapshots and the turn transition.

use crate::action::{Move, MoveError};
use crate::board::{Board, Link};
use crate::contracts::{Contract, MoveContract};
use crate::player::Player;
use crate::rules::{find_winner, place_peg};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// One immutable version of a game: board, links, turn-holder and winner.
///
/// Each accepted move produces a new snapshot; the old one is left as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    turn: Option<Player>,
    winner: Option<Player>,
    #[serde(default)]
    moves: Vec<Move>,
}

/// Result of an accepted move.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Snapshot after the move.
    pub state: GameState,
    /// Links formed by the placed peg.
    pub new_links: Vec<Link>,
}

impl GameState {
    /// Creates a fresh game: empty board, player 0 to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Some(Player::Blue),
            winner: None,
            moves: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player allowed to place the next peg, if any.
    pub fn turn(&self) -> Option<Player> {
        self.turn
    }

    /// Winner, once decided.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Player-formed links in creation order.
    pub fn links(&self) -> &[Link] {
        self.board.links()
    }

    /// Append-only log of placed pegs.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn set_turn(&mut self, turn: Option<Player>) {
        self.turn = turn;
    }

    /// Applies a peg placement, returning the next snapshot.
    ///
    /// Rejects the move with no change if the game is over, the mover does
    /// not hold the turn, or the node is not an empty grid cell. On success
    /// the turn passes to the opponent, or to nobody if the move wins.
    #[instrument(skip(self), fields(mov = %action))]
    pub fn apply_move(&self, action: Move) -> Result<TurnOutcome, MoveError> {
        MoveContract::pre(self, &action)?;

        let (board, new_links) = place_peg(&self.board, action.node, action.player)?;
        let mut next = Self {
            board,
            turn: Some(action.player.opponent()),
            winner: None,
            moves: self.moves.clone(),
        };
        next.moves.push(action);

        if let Some(winner) = find_winner(&next.board) {
            info!(%winner, "Goal edges connected");
            next.winner = Some(winner);
            next.turn = None;
        }

        #[cfg(debug_assertions)]
        MoveContract::post(self, &next)?;

        Ok(TurnOutcome {
            state: next,
            new_links,
        })
    }

    /// Ends the game with `winner` without a connecting chain.
    ///
    /// Used when the other player concedes or times out.
    pub fn concede_to(&self, winner: Player) -> Result<Self, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        let mut next = self.clone();
        next.winner = Some(winner);
        next.turn = None;
        Ok(next)
    }

    /// Rebuilds a state by applying `moves` to a fresh game.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(moves: &[Move]) -> Result<Self, MoveError> {
        moves
            .iter()
            .try_fold(Self::new(), |game, &action| Ok(game.apply_move(action)?.state))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
