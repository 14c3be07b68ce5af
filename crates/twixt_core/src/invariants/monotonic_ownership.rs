//! Monotonic ownership invariant: pegs are never moved or removed.

use super::Invariant;
use crate::board::GRID_NODES;
use crate::game::GameState;

/// Invariant: grid ownership is exactly what the move log produces.
///
/// Replays the move log onto an empty grid; every move must land on an
/// empty cell, and the result must match the board.
pub struct MonotonicOwnershipInvariant;

impl Invariant<GameState> for MonotonicOwnershipInvariant {
    fn holds(game: &GameState) -> bool {
        let mut owners = vec![None; GRID_NODES];

        for mov in game.moves() {
            let Some(slot) = owners.get_mut(mov.node.index()) else {
                return false;
            };
            if slot.is_some() {
                return false;
            }
            *slot = Some(mov.player);
        }

        game.board()
            .nodes()
            .iter()
            .take(GRID_NODES)
            .zip(owners)
            .all(|(node, owner)| node.owner() == owner)
    }

    fn description() -> &'static str {
        "Grid ownership matches the move log (pegs never change owner)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, NodeId, Player};

    #[test]
    fn test_empty_game_holds() {
        assert!(MonotonicOwnershipInvariant::holds(&GameState::new()));
    }

    #[test]
    fn test_moves_hold() {
        let game = GameState::replay(&[
            Move::new(Player::Blue, NodeId::grid(0, 0).unwrap()),
            Move::new(Player::Red, NodeId::grid(1, 1).unwrap()),
        ])
        .unwrap();
        assert!(MonotonicOwnershipInvariant::holds(&game));
    }

    #[test]
    fn test_overwritten_peg_violates() {
        let mut game =
            GameState::replay(&[Move::new(Player::Blue, NodeId::grid(0, 0).unwrap())]).unwrap();
        game.board_mut().claim(NodeId::grid(0, 0).unwrap(), Player::Red);
        assert!(!MonotonicOwnershipInvariant::holds(&game));
    }
}
