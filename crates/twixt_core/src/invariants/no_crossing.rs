//! No-crossing invariant: player-formed links never cross.

use super::Invariant;
use crate::game::GameState;
use crate::rules::links_cross;

/// Invariant: no two player-formed links cross, except at a shared endpoint.
pub struct NoCrossingInvariant;

impl Invariant<GameState> for NoCrossingInvariant {
    fn holds(game: &GameState) -> bool {
        let links = game.links();
        links
            .iter()
            .enumerate()
            .all(|(i, a)| links[i + 1..].iter().all(|b| !links_cross(a, b)))
    }

    fn description() -> &'static str {
        "Player-formed links never cross"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Link, Move, NodeId, Player};

    fn at(row: usize, col: usize) -> NodeId {
        NodeId::grid(row, col).unwrap()
    }

    #[test]
    fn test_blocked_link_keeps_invariant() {
        let game = GameState::replay(&[
            Move::new(Player::Blue, at(2, 2)),
            Move::new(Player::Red, at(2, 3)),
            Move::new(Player::Blue, at(4, 3)),
            Move::new(Player::Red, at(4, 2)),
        ])
        .unwrap();
        assert_eq!(game.links(), &[Link::new(at(2, 2), at(4, 3))]);
        assert!(NoCrossingInvariant::holds(&game));
    }

    #[test]
    fn test_forced_crossing_violates() {
        let mut game = GameState::replay(&[
            Move::new(Player::Blue, at(2, 2)),
            Move::new(Player::Red, at(2, 3)),
            Move::new(Player::Blue, at(4, 3)),
            Move::new(Player::Red, at(4, 2)),
        ])
        .unwrap();
        let board = game.board().clone().add_links([Link::new(at(2, 3), at(4, 2))]);
        *game.board_mut() = board;
        assert!(!NoCrossingInvariant::holds(&game));
    }
}
