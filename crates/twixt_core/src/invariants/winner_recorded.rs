//! Winner invariant: a completed chain is always recorded as the win.

use super::Invariant;
use crate::game::GameState;
use crate::rules::find_winner;

/// Invariant: if a player's pegs join their goal edges, that player is the
/// recorded winner.
///
/// A recorded winner without a chain is allowed, since a forfeit ends the
/// game without one.
pub struct WinnerRecordedInvariant;

impl Invariant<GameState> for WinnerRecordedInvariant {
    fn holds(game: &GameState) -> bool {
        find_winner(game.board())
            .is_none_or(|connected| game.winner() == Some(connected))
    }

    fn description() -> &'static str {
        "A connected chain is recorded as the winner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::place_peg;
    use crate::{Move, NodeId, Player};

    fn at(row: usize, col: usize) -> NodeId {
        NodeId::grid(row, col).unwrap()
    }

    fn blue_ladder() -> Vec<Move> {
        let blue: Vec<NodeId> = (0..12)
            .map(|i| at(i * 2 + 1, 5 + (i % 2)))
            .chain([at(0, 3)])
            .collect();
        let mut moves = Vec::new();
        for (i, node) in blue.into_iter().enumerate() {
            moves.push(Move::new(Player::Blue, node));
            if i < 12 {
                moves.push(Move::new(Player::Red, at(12, 10 + i)));
            }
        }
        moves
    }

    #[test]
    fn test_played_win_holds() {
        let game = GameState::replay(&blue_ladder()).unwrap();
        assert_eq!(game.winner(), Some(Player::Blue));
        assert!(WinnerRecordedInvariant::holds(&game));
    }

    #[test]
    fn test_forfeit_holds() {
        let game = GameState::new().concede_to(Player::Red).unwrap();
        assert!(WinnerRecordedInvariant::holds(&game));
    }

    #[test]
    fn test_unrecorded_chain_violates() {
        let mut moves = blue_ladder();
        let winning = moves.pop().unwrap();
        let mut game = GameState::replay(&moves).unwrap();
        let (board, _) = place_peg(game.board(), winning.node, Player::Blue).unwrap();
        *game.board_mut() = board;
        assert_eq!(game.winner(), None);
        assert!(!WinnerRecordedInvariant::holds(&game));
    }
}
