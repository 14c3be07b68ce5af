//! Peg placement and automatic link formation.
//!
//! A placed peg links to every same-owner peg a knight's move away unless
//! the link would cross a link already on the board. All links formed by
//! one placement share the new peg as an endpoint, so they cannot cross
//! each other; each candidate is tested against the links that existed
//! before the placement.

use super::crossing::links_cross;
use crate::action::MoveError;
use crate::board::{Board, Link, NodeId};
use crate::contracts::NodeIsVacant;
use crate::player::Player;
use tracing::{debug, instrument};

/// The eight knight's-move offsets as `(d_row, d_col)`.
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Links `player` would form from `node`, before crossing checks.
///
/// Only grid pegs qualify as partners; goal nodes are reached through
/// structural links, never through player-formed ones.
#[instrument(skip(board))]
pub fn candidate_links(board: &Board, node: NodeId, player: Player) -> Vec<Link> {
    let Some(origin) = node.position() else {
        return Vec::new();
    };
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_row, d_col)| origin.offset(d_row, d_col))
        .map(|pos| pos.id())
        .filter(|&partner| board.owner(partner) == Some(player))
        .map(|partner| Link::new(node, partner))
        .collect()
}

/// First existing link that `candidate` would cross, if any.
pub fn blocking_link(board: &Board, candidate: &Link) -> Option<Link> {
    board
        .links()
        .iter()
        .find(|existing| links_cross(candidate, existing))
        .copied()
}

/// Places a peg for `player` at `node` and forms its links.
///
/// Returns the updated board and the links formed, or an error if the
/// node cannot take a peg. Turn order and game-over checks belong to the
/// session; see [`GameState::apply_move`](crate::GameState::apply_move).
#[instrument(skip(board))]
pub fn place_peg(
    board: &Board,
    node: NodeId,
    player: Player,
) -> Result<(Board, Vec<Link>), MoveError> {
    NodeIsVacant::check(board, node)?;

    let formed: Vec<Link> = candidate_links(board, node, player)
        .into_iter()
        .filter(|candidate| match blocking_link(board, candidate) {
            Some(existing) => {
                debug!(%candidate, %existing, "Link blocked by crossing");
                false
            }
            None => true,
        })
        .collect();

    let mut next = board.clone();
    next.claim(node, player);
    let next = next.add_links(formed.iter().copied());

    debug!(links = formed.len(), "Peg placed");
    Ok((next, formed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Goal;

    fn at(row: usize, col: usize) -> NodeId {
        NodeId::grid(row, col).unwrap()
    }

    #[test]
    fn test_knight_neighbor_links() {
        let board = Board::new();
        let (board, first) = place_peg(&board, at(2, 2), Player::Blue).unwrap();
        assert!(first.is_empty());
        let (board, second) = place_peg(&board, at(4, 3), Player::Blue).unwrap();
        assert_eq!(second, vec![Link::new(at(2, 2), at(4, 3))]);
        assert_eq!(board.links(), &[Link::new(at(2, 2), at(4, 3))]);
        assert!(board.linked(at(2, 2), at(4, 3)));
    }

    #[test]
    fn test_opponent_peg_does_not_link() {
        let board = Board::new();
        let (board, _) = place_peg(&board, at(2, 2), Player::Red).unwrap();
        let (board, formed) = place_peg(&board, at(4, 3), Player::Blue).unwrap();
        assert!(formed.is_empty());
        assert!(board.links().is_empty());
    }

    #[test]
    fn test_non_knight_distance_does_not_link() {
        let board = Board::new();
        let (board, _) = place_peg(&board, at(2, 2), Player::Blue).unwrap();
        let (_, formed) = place_peg(&board, at(3, 3), Player::Blue).unwrap();
        assert!(formed.is_empty());
    }

    #[test]
    fn test_crossing_link_discarded() {
        let board = Board::new();
        let (board, _) = place_peg(&board, at(2, 2), Player::Blue).unwrap();
        let (board, _) = place_peg(&board, at(4, 3), Player::Blue).unwrap();
        let (board, _) = place_peg(&board, at(2, 3), Player::Red).unwrap();
        let (board, formed) = place_peg(&board, at(4, 2), Player::Red).unwrap();
        assert!(formed.is_empty());
        assert_eq!(board.links().len(), 1);
        assert_eq!(board.owner(at(4, 2)), Some(Player::Red));
    }

    #[test]
    fn test_one_peg_forms_several_links() {
        let mut board = Board::new();
        for node in [at(3, 3), at(7, 3), at(5, 1)] {
            board = place_peg(&board, node, Player::Red).unwrap().0;
        }
        let (board, formed) = place_peg(&board, at(5, 4), Player::Red).unwrap();
        assert_eq!(formed.len(), 2);
        assert!(board.linked(at(5, 4), at(3, 3)));
        assert!(board.linked(at(5, 4), at(7, 3)));
        assert!(!board.linked(at(5, 4), at(5, 1)));
    }

    #[test]
    fn test_occupied_and_goal_nodes_rejected() {
        let board = Board::new();
        let (board, _) = place_peg(&board, at(0, 0), Player::Blue).unwrap();
        assert_eq!(
            place_peg(&board, at(0, 0), Player::Red).unwrap_err(),
            MoveError::NodeOccupied(at(0, 0))
        );
        assert_eq!(
            place_peg(&board, Goal::Left.id(), Player::Red).unwrap_err(),
            MoveError::GoalNode(Goal::Left.id())
        );
    }

    #[test]
    fn test_candidates_near_edge_are_clipped() {
        let mut board = Board::new();
        board.claim(at(1, 2), Player::Blue);
        board.claim(at(2, 1), Player::Blue);
        let candidates = candidate_links(&board, at(0, 0), Player::Blue);
        assert_eq!(candidates.len(), 2);
    }
}
