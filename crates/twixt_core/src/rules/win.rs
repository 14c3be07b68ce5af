//! Win detection for TwixT.

use crate::board::{Board, Goal};
use crate::player::Player;
use std::collections::VecDeque;
use tracing::instrument;

/// Returns true if `player` has a chain from one goal node to the other.
///
/// Breadth-first search from the player's first goal node, stepping only
/// onto nodes the player owns. Goal nodes are owned by their player, so
/// they act as ordinary hops; the opponent's goals are never entered.
#[instrument(skip(board))]
pub fn has_connection(board: &Board, player: Player) -> bool {
    let (start, target) = Goal::pair(player);
    let (start, target) = (start.id(), target.id());

    let mut visited = vec![false; board.nodes().len()];
    let mut queue = VecDeque::from([start]);
    visited[start.index()] = true;

    while let Some(current) = queue.pop_front() {
        if current == target {
            return true;
        }
        for &next in board.node(current).neighbors() {
            if !visited[next.index()] && board.owner(next) == Some(player) {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }

    false
}

/// Checks if either player has connected their goal edges.
///
/// Player 0 is checked first, then player 1; the first connected player is
/// returned.
#[instrument(skip(board))]
pub fn find_winner(board: &Board) -> Option<Player> {
    [Player::Blue, Player::Red]
        .into_iter()
        .find(|&player| has_connection(board, player))
}
