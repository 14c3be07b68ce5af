//! Alternating turn invariant: player 0, player 1, player 0, ...

use super::Invariant;
use crate::game::GameState;
use crate::player::Player;

/// Invariant: players alternate turns.
///
/// The move log starts with player 0 and never repeats a player. While the
/// game is open the turn-holder is the player after the last mover; once a
/// winner is recorded nobody holds the turn.
pub struct AlternatingTurnInvariant;

impl Invariant<GameState> for AlternatingTurnInvariant {
    fn holds(game: &GameState) -> bool {
        let moves = game.moves();

        if let Some(first) = moves.first()
            && first.player != Player::Blue
        {
            return false;
        }

        if moves.windows(2).any(|pair| pair[0].player == pair[1].player) {
            return false;
        }

        if game.winner().is_some() {
            return game.turn().is_none();
        }

        let expected = moves
            .last()
            .map_or(Player::Blue, |last| last.player.opponent());
        game.turn() == Some(expected)
    }

    fn description() -> &'static str {
        "Players alternate turns (player 0 first)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, NodeId};

    #[test]
    fn test_empty_game_holds() {
        let game = GameState::new();
        assert!(AlternatingTurnInvariant::holds(&game));
        assert_eq!(game.turn(), Some(Player::Blue));
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let game = GameState::replay(&[
            Move::new(Player::Blue, NodeId::grid(0, 0).unwrap()),
            Move::new(Player::Red, NodeId::grid(1, 1).unwrap()),
            Move::new(Player::Blue, NodeId::grid(2, 2).unwrap()),
        ])
        .unwrap();
        assert!(AlternatingTurnInvariant::holds(&game));
        assert_eq!(game.turn(), Some(Player::Red));
    }

    #[test]
    fn test_stale_turn_violates() {
        let mut game =
            GameState::replay(&[Move::new(Player::Blue, NodeId::grid(0, 0).unwrap())]).unwrap();
        game.set_turn(Some(Player::Blue));
        assert!(!AlternatingTurnInvariant::holds(&game));
    }
}
