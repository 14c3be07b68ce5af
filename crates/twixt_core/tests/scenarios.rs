//! End-to-end scenarios for the game engine.

use twixt_core::invariants::{InvariantSet, TwixtInvariants};
use twixt_core::rules::{find_winner, links_cross};
use twixt_core::{
    Board, GameSession, GameState, Goal, Link, Move, MoveError, NodeId, Phase, Player,
    SessionError,
};

fn at(row: usize, col: usize) -> NodeId {
    NodeId::grid(row, col).expect("on grid")
}

#[test]
fn test_fresh_board_has_no_winner() {
    let board = Board::new();
    assert_eq!(board.nodes().len(), 580);
    assert_eq!(board.structural_link_count(), 96);
    assert_eq!(find_winner(&board), None);
}

#[test]
fn test_knight_pegs_link() {
    let game = GameState::replay(&[
        Move::new(Player::Blue, at(2, 2)),
        Move::new(Player::Red, at(12, 12)),
        Move::new(Player::Blue, at(4, 3)),
    ])
    .expect("valid replay");

    assert_eq!(game.links(), &[Link::new(at(2, 2), at(4, 3))]);
}

#[test]
fn test_crossing_pair_rejected() {
    let first = Link::new(at(0, 0), at(4, 2));
    let second = Link::new(at(0, 2), at(4, 0));
    assert!(links_cross(&first, &second));

    // Same shape with real knight links: player 1's link is refused.
    let game = GameState::replay(&[
        Move::new(Player::Blue, at(2, 2)),
        Move::new(Player::Red, at(2, 3)),
        Move::new(Player::Blue, at(4, 3)),
        Move::new(Player::Red, at(4, 2)),
    ])
    .expect("valid replay");
    assert_eq!(game.links(), &[Link::new(at(2, 2), at(4, 3))]);
    assert!(!game.board().linked(at(2, 3), at(4, 2)));
}

#[test]
fn test_minimal_winning_path_for_player_zero() {
    let mut session = GameSession::new();
    session.join("alice".into()).expect("seat 0");
    session.join("bob".into()).expect("seat 1");

    // Player 0 walks a knight's ladder down column 5/6; player 1 plays
    // harmlessly along row 12 on the far right.
    let blue: Vec<NodeId> = (0..12)
        .map(|i| at(i * 2 + 1, 5 + (i % 2)))
        .chain([at(0, 3)])
        .collect();
    let red: Vec<NodeId> = (0..12).map(|i| at(12, 10 + i)).collect();

    let mut last = None;
    for (i, node) in blue.iter().enumerate() {
        last = Some(session.take_turn(&"alice".into(), *node).expect("blue move"));
        if i + 1 < blue.len() {
            session.take_turn(&"bob".into(), red[i]).expect("red move");
        }
    }

    let outcome = last.expect("moves were made");
    assert_eq!(outcome.state.winner(), Some(Player::Blue));
    assert_eq!(find_winner(outcome.state.board()), Some(Player::Blue));
    assert_eq!(session.phase(), Phase::Completed { winner: Player::Blue });
    assert!(session.state().board().linked(at(0, 3), Goal::Top.id()));
    assert!(TwixtInvariants::check_all(session.state()).is_ok());

    assert_eq!(
        session.take_turn(&"bob".into(), at(20, 20)).unwrap_err(),
        SessionError::Move(MoveError::GameOver)
    );
}

#[test]
fn test_third_join_leaves_seats_alone() {
    let mut session = GameSession::new();
    session.join("alice".into()).expect("seat 0");
    session.join("bob".into()).expect("seat 1");

    assert_eq!(session.join("carol".into()), Err(SessionError::GameFull));
    assert_eq!(session.participant(Player::Blue), Some(&"alice".into()));
    assert_eq!(session.participant(Player::Red), Some(&"bob".into()));
    assert_eq!(session.participants().count(), 2);
}

#[test]
fn test_snapshot_survives_wire_round_trip() {
    let game = GameState::replay(&[
        Move::new(Player::Blue, at(2, 2)),
        Move::new(Player::Red, at(12, 12)),
        Move::new(Player::Blue, at(4, 3)),
    ])
    .expect("valid replay");
    let json = serde_json::to_string(&game).expect("serialize");
    let back: GameState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, game);
}
