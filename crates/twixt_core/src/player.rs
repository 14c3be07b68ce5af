//! The two sides of a TwixT game.

use serde::{Deserialize, Serialize};

/// A player in the game.
///
/// Players travel over the wire as their seat index (`0` or `1`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    /// Player 0: connects the top edge to the bottom edge. Moves first.
    #[display("player 0")]
    Blue,
    /// Player 1: connects the left edge to the right edge.
    #[display("player 1")]
    Red,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Blue => Player::Red,
            Player::Red => Player::Blue,
        }
    }

    /// Seat index of this player (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Player::Blue => 0,
            Player::Red => 1,
        }
    }

    /// Player seated at `index`, if the index is a valid seat.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::Blue),
            1 => Some(Player::Red),
            _ => None,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.index() as u8
    }
}

/// A seat index outside `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no player with seat index {}", _0)]
pub struct UnknownPlayer(#[error(not(source))] pub u8);

impl TryFrom<u8> for Player {
    type Error = UnknownPlayer;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Player::from_index(value as usize).ok_or(UnknownPlayer(value))
    }
}
