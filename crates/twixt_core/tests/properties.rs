//! Property tests over random legal games.

use proptest::prelude::*;
use twixt_core::invariants::{InvariantSet, TwixtInvariants};
use twixt_core::rules::{find_winner, links_cross};
use twixt_core::{BOARD_SIZE, GameState, Move, NodeId, Player};

/// Plays the given cells in order, skipping occupied ones, until the list
/// runs out or someone wins. Returns every snapshot including the first.
fn play(cells: &[(usize, usize)]) -> Vec<GameState> {
    let mut snapshots = vec![GameState::new()];
    for &(row, col) in cells {
        let current = snapshots.last().cloned().unwrap_or_default();
        let Some(player) = current.turn() else {
            break;
        };
        let node = NodeId::grid(row, col).unwrap();
        if let Ok(outcome) = current.apply_move(Move::new(player, node)) {
            snapshots.push(outcome.state);
        }
    }
    snapshots
}

fn cells() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 0..200)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_links_cross(cells in cells()) {
        let snapshots = play(&cells);
        let last = snapshots.last().unwrap();
        let links = last.links();
        for (i, a) in links.iter().enumerate() {
            for b in &links[i + 1..] {
                prop_assert!(!links_cross(a, b), "{} crosses {}", a, b);
            }
        }
    }

    #[test]
    fn prop_ownership_never_changes(cells in cells()) {
        let snapshots = play(&cells);
        for pair in snapshots.windows(2) {
            for (old, new) in pair[0].board().nodes().iter().zip(pair[1].board().nodes()) {
                if old.owner().is_some() {
                    prop_assert_eq!(old.owner(), new.owner());
                }
            }
        }
    }

    #[test]
    fn prop_turns_alternate_until_win(cells in cells()) {
        let snapshots = play(&cells);
        for pair in snapshots.windows(2) {
            let mover = pair[0].turn().unwrap();
            match pair[1].winner() {
                Some(_) => prop_assert_eq!(pair[1].turn(), None),
                None => prop_assert_eq!(pair[1].turn(), Some(mover.opponent())),
            }
        }
        let last = snapshots.last().unwrap();
        if last.winner().is_some() {
            let any = NodeId::grid(0, 0).unwrap();
            prop_assert!(last.apply_move(Move::new(Player::Blue, any)).is_err());
            prop_assert!(last.apply_move(Move::new(Player::Red, any)).is_err());
        }
    }

    #[test]
    fn prop_win_detection_is_idempotent(cells in cells()) {
        let snapshots = play(&cells);
        let last = snapshots.last().unwrap();
        prop_assert_eq!(find_winner(last.board()), find_winner(last.board()));
        prop_assert_eq!(find_winner(last.board()), last.winner());
    }

    #[test]
    fn prop_invariants_hold(cells in cells()) {
        let snapshots = play(&cells);
        for snapshot in &snapshots {
            prop_assert!(TwixtInvariants::check_all(snapshot).is_ok());
        }
    }
}
