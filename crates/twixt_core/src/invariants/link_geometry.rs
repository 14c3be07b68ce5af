//! Link geometry invariant: links join same-owner pegs a knight's move apart.

use super::Invariant;
use crate::board::GRID_NODES;
use crate::game::GameState;
use crate::rules::KNIGHT_OFFSETS;

/// Invariant: every player-formed link is well shaped.
///
/// - Both endpoints are grid pegs with the same owner.
/// - The endpoints are a knight's move apart.
/// - The link appears in both endpoints' adjacency, and no grid-to-grid
///   adjacency exists without a recorded link.
pub struct LinkGeometryInvariant;

impl Invariant<GameState> for LinkGeometryInvariant {
    fn holds(game: &GameState) -> bool {
        let board = game.board();

        let links_ok = board.links().iter().all(|link| {
            let (a, b) = link.endpoints();
            let (Some(pa), Some(pb)) = (a.position(), b.position()) else {
                return false;
            };
            let owner = board.owner(a);
            let offset = (pb.row as i32 - pa.row as i32, pb.col as i32 - pa.col as i32);
            owner.is_some()
                && owner == board.owner(b)
                && KNIGHT_OFFSETS.contains(&offset)
                && board.linked(a, b)
                && board.linked(b, a)
        });

        let grid_edges = board
            .nodes()
            .iter()
            .take(GRID_NODES)
            .map(|node| node.neighbors().iter().filter(|n| !n.is_goal()).count())
            .sum::<usize>();

        links_ok && grid_edges == board.links().len() * 2
    }

    fn description() -> &'static str {
        "Links join same-owner pegs a knight's move apart"
    }
}
