//! Border link invariant: goal adjacency is fixed at board creation.

use super::Invariant;
use crate::board::Board;
use crate::game::GameState;

/// Invariant: every node's goal adjacency matches a fresh board.
///
/// Goal nodes keep exactly their border cells as neighbors, and no grid
/// cell gains or loses a goal neighbor.
pub struct BorderLinksInvariant;

impl Invariant<GameState> for BorderLinksInvariant {
    fn holds(game: &GameState) -> bool {
        let fresh = Board::new();
        game.board()
            .nodes()
            .iter()
            .zip(fresh.nodes())
            .all(|(node, clean)| {
                if node.id().is_goal() {
                    node.neighbors() == clean.neighbors()
                } else {
                    let goals = node.neighbors().iter().filter(|n| n.is_goal());
                    goals.eq(clean.neighbors().iter().filter(|n| n.is_goal()))
                }
            })
    }

    fn description() -> &'static str {
        "Goal nodes are linked to exactly their border cells"
    }
}
