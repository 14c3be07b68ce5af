//! Two-seat game session: who is playing, and the current snapshot.
//!
//! Phases:
//! - `AwaitingPlayers`: fewer than two participants seated.
//! - `InProgress`: both seats filled, no winner, turns alternate.
//! - `Completed`: a winner is recorded; no more turns are accepted.

use crate::action::{Move, MoveError};
use crate::board::{Board, NodeId};
use crate::game::{GameState, TurnOutcome};
use crate::invariants::{InvariantSet, TwixtInvariants, ownership_preserved};
use crate::player::Player;
use crate::rules::find_winner;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Opaque identity of a participant, stable across reconnections.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case", tag = "phase")]
pub enum Phase {
    /// Zero or one participant seated.
    #[display("awaiting players")]
    AwaitingPlayers,
    /// Both seats filled and the game is open.
    #[display("in progress")]
    InProgress,
    /// A winner has been decided.
    #[display("completed ({})", winner)]
    Completed {
        /// The winning player.
        winner: Player,
    },
}

/// Error from a session transition.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum SessionError {
    /// Both seats are taken by other participants.
    #[display("game already has two participants")]
    GameFull,

    /// The participant holds no seat in this session.
    #[display("{} is not seated in this game", _0)]
    NotSeated(ParticipantId),

    /// The second seat is still empty.
    #[display("waiting for a second participant")]
    AwaitingPlayers,

    /// A proposed snapshot is not a valid successor of the current one.
    #[display("rejected snapshot: {}", _0)]
    InvalidSnapshot(String),

    /// The move itself is illegal.
    #[display("illegal move: {}", _0)]
    #[from]
    Move(MoveError),
}

impl std::error::Error for SessionError {}

/// A game between two seated participants.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    seats: [Option<ParticipantId>; 2],
    state: GameState,
}

impl GameSession {
    /// Creates a session with empty seats and a fresh board.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if let Some(winner) = self.state.winner() {
            Phase::Completed { winner }
        } else if self.seats.iter().all(Option::is_some) {
            Phase::InProgress
        } else {
            Phase::AwaitingPlayers
        }
    }

    /// Participant in `seat`, if filled.
    pub fn participant(&self, seat: Player) -> Option<&ParticipantId> {
        self.seats[seat.index()].as_ref()
    }

    /// Seated participants in seat order.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.seats.iter().flatten()
    }

    /// Seat held by `participant`.
    pub fn seat_of(&self, participant: &ParticipantId) -> Option<Player> {
        self.seats
            .iter()
            .position(|seat| seat.as_ref() == Some(participant))
            .and_then(Player::from_index)
    }

    /// The participant facing `participant`, if both are seated.
    pub fn opponent_of(&self, participant: &ParticipantId) -> Option<&ParticipantId> {
        let seat = self.seat_of(participant)?;
        self.participant(seat.opponent())
    }

    /// Seats a participant in the first open seat.
    ///
    /// A participant who is already seated keeps their seat, so presenting
    /// the same identity again is how a peer reconnects.
    #[instrument(skip(self), fields(participant = %participant))]
    pub fn join(&mut self, participant: ParticipantId) -> Result<Player, SessionError> {
        if let Some(seat) = self.seat_of(&participant) {
            debug!(%seat, "Participant already seated");
            return Ok(seat);
        }

        let Some(index) = self.seats.iter().position(Option::is_none) else {
            warn!("Game already has two participants");
            return Err(SessionError::GameFull);
        };
        let seat = Player::from_index(index).ok_or(SessionError::GameFull)?;

        info!(%seat, "Seating participant");
        self.seats[index] = Some(participant);
        Ok(seat)
    }

    /// Seat of an in-progress game's participant, or why they cannot move.
    fn active_seat(&self, participant: &ParticipantId) -> Result<Player, SessionError> {
        let seat = self
            .seat_of(participant)
            .ok_or_else(|| SessionError::NotSeated(participant.clone()))?;
        match self.phase() {
            Phase::AwaitingPlayers => Err(SessionError::AwaitingPlayers),
            Phase::Completed { .. } => Err(MoveError::GameOver.into()),
            Phase::InProgress => Ok(seat),
        }
    }

    /// Places a peg for `participant` at `node`.
    ///
    /// On success the session moves to the new snapshot; on failure it is
    /// unchanged.
    #[instrument(skip(self), fields(participant = %participant, node = %node))]
    pub fn take_turn(
        &mut self,
        participant: &ParticipantId,
        node: NodeId,
    ) -> Result<TurnOutcome, SessionError> {
        let seat = self.active_seat(participant)?;
        let outcome = self.state.apply_move(Move::new(seat, node))?;
        self.state = outcome.state.clone();

        info!(
            %seat,
            links = outcome.new_links.len(),
            phase = %self.phase(),
            "Turn accepted"
        );
        Ok(outcome)
    }

    /// Works out which peg a peer-computed snapshot adds.
    ///
    /// The proposal must own exactly one more grid cell than the current
    /// state, owned by `participant`'s seat, and change nothing else that
    /// is already owned.
    #[instrument(skip(self, proposed), fields(participant = %participant))]
    pub fn infer_move(
        &self,
        participant: &ParticipantId,
        proposed: &GameState,
    ) -> Result<NodeId, SessionError> {
        let seat = self.active_seat(participant)?;
        let current = self.state.board();

        if !ownership_preserved_ignoring_links(current, proposed) {
            return Err(SessionError::InvalidSnapshot(
                "an existing peg changed owner".to_string(),
            ));
        }

        let mut added = current
            .nodes()
            .iter()
            .zip(proposed.board().nodes())
            .filter(|(old, new)| old.owner().is_none() && new.owner().is_some())
            .map(|(_, new)| (new.id(), new.owner()));

        match (added.next(), added.next()) {
            (Some((node, Some(owner))), None) if owner == seat => Ok(node),
            (Some((_, Some(owner))), None) => Err(MoveError::WrongPlayer(owner).into()),
            (None, _) => Err(SessionError::InvalidSnapshot("no peg placed".to_string())),
            _ => Err(SessionError::InvalidSnapshot(
                "more than one peg placed".to_string(),
            )),
        }
    }

    /// Adopts a peer-computed snapshot as the next state without replaying
    /// the move.
    ///
    /// The acting participant must hold the turn. The snapshot must extend
    /// the current one and satisfy every invariant once the turn has been
    /// handed to the opponent (or cleared, if the snapshot has a winner).
    #[instrument(skip(self, proposed), fields(participant = %participant))]
    pub fn accept_snapshot(
        &mut self,
        participant: &ParticipantId,
        proposed: GameState,
    ) -> Result<&GameState, SessionError> {
        let seat = self.active_seat(participant)?;
        if self.state.turn() != Some(seat) {
            return Err(MoveError::WrongPlayer(seat).into());
        }

        let extends_log = proposed.moves().len() == self.state.moves().len() + 1
            && proposed.moves().starts_with(self.state.moves())
            && proposed.moves().last().is_some_and(|mov| mov.player == seat);
        if !extends_log {
            return Err(SessionError::InvalidSnapshot(
                "snapshot must add exactly one move by the turn-holder".to_string(),
            ));
        }

        if proposed.winner() != find_winner(proposed.board()) {
            return Err(SessionError::InvalidSnapshot(
                "winner does not match the board".to_string(),
            ));
        }

        let mut next = proposed;
        next.set_turn(match next.winner() {
            Some(_) => None,
            None => Some(seat.opponent()),
        });

        if !ownership_preserved(self.state.board(), next.board()) {
            return Err(SessionError::InvalidSnapshot(
                "snapshot drops existing pegs or links".to_string(),
            ));
        }
        TwixtInvariants::check_all(&next).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            SessionError::InvalidSnapshot(descriptions)
        })?;

        info!(%seat, phase = %self.phase(), "Snapshot adopted");
        self.state = next;
        Ok(&self.state)
    }

    /// Ends the game in favour of `loser`'s opponent.
    #[instrument(skip(self))]
    pub fn forfeit(&mut self, loser: Player) -> Result<Player, SessionError> {
        if self.phase() == Phase::AwaitingPlayers {
            return Err(SessionError::AwaitingPlayers);
        }
        let winner = loser.opponent();
        self.state = self.state.concede_to(winner)?;
        info!(%loser, %winner, "Game forfeited");
        Ok(winner)
    }
}

fn ownership_preserved_ignoring_links(current: &Board, proposed: &GameState) -> bool {
    current
        .nodes()
        .iter()
        .zip(proposed.board().nodes())
        .all(|(old, new)| old.owner().is_none() || old.owner() == new.owner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: usize, col: usize) -> NodeId {
        NodeId::grid(row, col).unwrap()
    }

    fn seated() -> GameSession {
        let mut session = GameSession::new();
        session.join("alice".into()).unwrap();
        session.join("bob".into()).unwrap();
        session
    }

    #[test]
    fn test_phases() {
        let mut session = GameSession::new();
        assert_eq!(session.phase(), Phase::AwaitingPlayers);
        assert_eq!(session.join("alice".into()), Ok(Player::Blue));
        assert_eq!(session.phase(), Phase::AwaitingPlayers);
        assert_eq!(session.join("bob".into()), Ok(Player::Red));
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_third_join_refused() {
        let mut session = seated();
        assert_eq!(session.join("carol".into()), Err(SessionError::GameFull));
        let seated: Vec<_> = session.participants().map(ParticipantId::as_str).collect();
        assert_eq!(seated, ["alice", "bob"]);
    }

    #[test]
    fn test_rejoin_keeps_seat() {
        let mut session = seated();
        assert_eq!(session.join("bob".into()), Ok(Player::Red));
    }

    #[test]
    fn test_turn_before_opponent_joins() {
        let mut session = GameSession::new();
        session.join("alice".into()).unwrap();
        assert_eq!(
            session.take_turn(&"alice".into(), at(3, 3)).unwrap_err(),
            SessionError::AwaitingPlayers
        );
    }

    #[test]
    fn test_turns_alternate() {
        let mut session = seated();
        session.take_turn(&"alice".into(), at(3, 3)).unwrap();
        assert_eq!(
            session.take_turn(&"alice".into(), at(4, 4)).unwrap_err(),
            SessionError::Move(MoveError::WrongPlayer(Player::Blue))
        );
        session.take_turn(&"bob".into(), at(4, 4)).unwrap();
        assert_eq!(session.state().turn(), Some(Player::Blue));
    }

    #[test]
    fn test_stranger_cannot_move() {
        let mut session = seated();
        assert_eq!(
            session.take_turn(&"mallory".into(), at(3, 3)).unwrap_err(),
            SessionError::NotSeated("mallory".into())
        );
    }

    #[test]
    fn test_infer_move_from_proposal() {
        let session = seated();
        let proposed = session
            .state()
            .apply_move(Move::new(Player::Blue, at(6, 6)))
            .unwrap()
            .state;
        assert_eq!(session.infer_move(&"alice".into(), &proposed), Ok(at(6, 6)));
        assert!(session.infer_move(&"alice".into(), session.state()).is_err());
    }

    #[test]
    fn test_accept_snapshot_flips_turn() {
        let mut session = seated();
        let proposed = session
            .state()
            .apply_move(Move::new(Player::Blue, at(6, 6)))
            .unwrap()
            .state;
        let adopted = session.accept_snapshot(&"alice".into(), proposed).unwrap();
        assert_eq!(adopted.turn(), Some(Player::Red));
    }

    #[test]
    fn test_accept_snapshot_rejects_forgery() {
        let mut session = seated();
        let mut proposed = session.state().clone();
        proposed.board_mut().claim(at(6, 6), Player::Red);
        assert!(matches!(
            session.accept_snapshot(&"alice".into(), proposed),
            Err(SessionError::InvalidSnapshot(_))
        ));
        assert!(session.state().moves().is_empty());
    }

    #[test]
    fn test_accept_snapshot_rejects_claimed_winner() {
        let mut session = seated();
        let proposed = session
            .state()
            .apply_move(Move::new(Player::Blue, at(6, 6)))
            .unwrap()
            .state
            .concede_to(Player::Blue)
            .unwrap();
        assert!(matches!(
            session.accept_snapshot(&"alice".into(), proposed),
            Err(SessionError::InvalidSnapshot(_))
        ));
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_forfeit_completes_game() {
        let mut session = seated();
        assert_eq!(session.forfeit(Player::Blue), Ok(Player::Red));
        assert_eq!(session.phase(), Phase::Completed { winner: Player::Red });
        assert_eq!(
            session.take_turn(&"bob".into(), at(1, 1)).unwrap_err(),
            SessionError::Move(MoveError::GameOver)
        );
    }
}
