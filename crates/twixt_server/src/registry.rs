//! Session registry: live games and the turn relay between their peers.
//!
//! Each game sits behind its own lock so turns in different games never
//! contend. Peer connections are bound per game, inside the game's record,
//! so one identity can sit in several games on different sockets.

use crate::connection::{Connection, ConnectionId};
use crate::error::RelayError;
use crate::protocol::{GameOverReason, ServerEvent};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use twixt_core::{GameSession, GameState, NodeId, ParticipantId, Phase, Player};

/// Unique identifier for a game.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// One recorded snapshot of a game.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// State after the change.
    snapshot: GameState,
    /// Participant whose turn produced it. `None` for creation and forfeits.
    actor: Option<ParticipantId>,
    /// Wall-clock time the snapshot was recorded.
    recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(snapshot: GameState, actor: Option<ParticipantId>) -> Self {
        Self {
            snapshot,
            actor,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
struct GameRecord {
    session: GameSession,
    history: Vec<HistoryEntry>,
    connections: HashMap<ParticipantId, Connection>,
    last_activity: Instant,
}

impl GameRecord {
    fn new(now: Instant) -> Self {
        let session = GameSession::new();
        let history = vec![HistoryEntry::new(session.state().clone(), None)];
        Self {
            session,
            history,
            connections: HashMap::new(),
            last_activity: now,
        }
    }

    fn bind(&mut self, participant: ParticipantId, connection: Connection) {
        let id = connection.id();
        if let Some(previous) = self.connections.insert(participant, connection) {
            debug!(previous = previous.id(), connection = id, "Replaced earlier connection");
        }
    }

    fn notify(&self, participant: &ParticipantId, event: ServerEvent) -> bool {
        self.connections
            .get(participant)
            .is_some_and(|connection| connection.send(event))
    }

    fn commit(&mut self, actor: Option<ParticipantId>, now: Instant) {
        self.history
            .push(HistoryEntry::new(self.session.state().clone(), actor));
        self.last_activity = now;
    }
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct Joined {
    /// Seat held by the participant.
    pub seat: Player,
    /// Latest snapshot.
    pub state: GameState,
}

/// Result of a recorded turn.
#[derive(Debug, Clone)]
pub struct TurnReceipt {
    /// Authoritative snapshot after the turn.
    pub state: GameState,
    /// Whether the opponent's connection accepted the relayed snapshot.
    pub relayed: bool,
}

/// Registry of live games and their connected peers.
///
/// Cheap to clone; clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    games: Arc<Mutex<HashMap<GameId, Arc<Mutex<GameRecord>>>>>,
    trust_client_state: bool,
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// With `trust_client_state` set, submitted snapshots are adopted after
    /// invariant checks. Otherwise the placed peg is inferred and the move
    /// is recomputed.
    #[instrument]
    pub fn new(trust_client_state: bool) -> Self {
        info!("Creating session registry");
        Self {
            trust_client_state,
            ..Self::default()
        }
    }

    /// Allocates a new game with a fresh board.
    #[instrument(skip(self))]
    pub fn create_game(&self) -> GameId {
        let game_id = GameId::generate();
        let record = GameRecord::new(Instant::now());
        let mut games = self.games.lock();
        games.insert(game_id.clone(), Arc::new(Mutex::new(record)));
        info!(%game_id, games = games.len(), "Created game");
        game_id
    }

    fn record(&self, game_id: &GameId) -> Result<Arc<Mutex<GameRecord>>, RelayError> {
        self.games
            .lock()
            .get(game_id)
            .cloned()
            .ok_or_else(|| RelayError::GameNotFound(game_id.clone()))
    }

    fn records(&self) -> Vec<(GameId, Arc<Mutex<GameRecord>>)> {
        self.games
            .lock()
            .iter()
            .map(|(id, record)| (id.clone(), Arc::clone(record)))
            .collect()
    }

    /// Seats `participant` in a game, binding `connection` if given.
    ///
    /// A participant already seated keeps their seat and has their
    /// connection for this game replaced. The opponent, if connected, is
    /// told. The idle clock starts when the second seat is first filled.
    #[instrument(skip(self, connection), fields(game_id = %game_id, participant = %participant))]
    pub fn join_game(
        &self,
        game_id: &GameId,
        participant: ParticipantId,
        connection: Option<Connection>,
    ) -> Result<Joined, RelayError> {
        let record = self.record(game_id)?;
        let mut record = record.lock();

        let was_waiting = record.session.phase() == Phase::AwaitingPlayers;
        let seat = record
            .session
            .join(participant.clone())
            .map_err(|e| RelayError::from_session(game_id, e))?;
        if was_waiting && record.session.phase() == Phase::InProgress {
            record.last_activity = Instant::now();
        }

        if let Some(connection) = connection {
            record.bind(participant.clone(), connection);
        }
        if let Some(opponent) = record.session.opponent_of(&participant) {
            let notified = record.notify(
                opponent,
                ServerEvent::OpponentJoined {
                    game_id: game_id.clone(),
                    seat,
                },
            );
            debug!(%opponent, notified, "Told opponent about join");
        }

        info!(%seat, "Participant joined");
        Ok(Joined {
            seat,
            state: record.session.state().clone(),
        })
    }

    /// Records a turn submitted as a full snapshot.
    #[instrument(skip(self, proposed), fields(game_id = %game_id, participant = %participant))]
    pub fn end_turn(
        &self,
        game_id: &GameId,
        participant: &ParticipantId,
        proposed: GameState,
    ) -> Result<TurnReceipt, RelayError> {
        let record = self.record(game_id)?;
        let mut record = record.lock();
        let opponent = Self::opponent(game_id, &record.session, participant)?;

        if self.trust_client_state {
            record
                .session
                .accept_snapshot(participant, proposed)
                .map_err(|e| RelayError::from_session(game_id, e))?;
        } else {
            let node = record
                .session
                .infer_move(participant, &proposed)
                .map_err(|e| RelayError::from_session(game_id, e))?;
            record
                .session
                .take_turn(participant, node)
                .map_err(|e| RelayError::from_session(game_id, e))?;
        }

        Ok(Self::commit(game_id, &mut record, participant, &opponent))
    }

    /// Records a turn submitted as a single peg placement.
    #[instrument(skip(self), fields(game_id = %game_id, participant = %participant, node = %node))]
    pub fn place_peg(
        &self,
        game_id: &GameId,
        participant: &ParticipantId,
        node: NodeId,
    ) -> Result<TurnReceipt, RelayError> {
        let record = self.record(game_id)?;
        let mut record = record.lock();
        let opponent = Self::opponent(game_id, &record.session, participant)?;

        record
            .session
            .take_turn(participant, node)
            .map_err(|e| RelayError::from_session(game_id, e))?;

        Ok(Self::commit(game_id, &mut record, participant, &opponent))
    }

    fn opponent(
        game_id: &GameId,
        session: &GameSession,
        participant: &ParticipantId,
    ) -> Result<ParticipantId, RelayError> {
        if session.seat_of(participant).is_none() {
            return Err(RelayError::NotParticipant {
                game: game_id.clone(),
                participant: participant.clone(),
            });
        }
        session
            .opponent_of(participant)
            .cloned()
            .ok_or_else(|| RelayError::OpponentUnavailable(game_id.clone()))
    }

    fn commit(
        game_id: &GameId,
        record: &mut GameRecord,
        actor: &ParticipantId,
        opponent: &ParticipantId,
    ) -> TurnReceipt {
        record.commit(Some(actor.clone()), Instant::now());
        let state = record.session.state().clone();

        let relayed = record.notify(
            opponent,
            ServerEvent::EndedTurn {
                game_id: game_id.clone(),
                state: state.clone(),
            },
        );
        if !relayed {
            warn!(%opponent, "Opponent not connected; turn recorded without relay");
        }

        if let Some(winner) = state.winner() {
            info!(%winner, "Game over");
            debug!(board = %state.board().render(), "Final position");
            record.notify(
                opponent,
                ServerEvent::GameOver {
                    game_id: game_id.clone(),
                    winner,
                    reason: GameOverReason::Connected,
                },
            );
        }

        TurnReceipt { state, relayed }
    }

    /// Latest snapshot of a game.
    pub fn latest(&self, game_id: &GameId) -> Result<GameState, RelayError> {
        let record = self.record(game_id)?;
        let snapshot = record.lock().session.state().clone();
        Ok(snapshot)
    }

    /// Every snapshot recorded for a game, oldest first.
    pub fn history(&self, game_id: &GameId) -> Result<Vec<HistoryEntry>, RelayError> {
        let record = self.record(game_id)?;
        let history = record.lock().history.clone();
        Ok(history)
    }

    /// Drops every binding, in any game, that points at `connection`.
    ///
    /// A newer connection for the same participant is left alone.
    #[instrument(skip(self))]
    pub fn unbind_connection(&self, connection: ConnectionId) {
        for (game_id, record) in self.records() {
            let mut record = record.lock();
            let before = record.connections.len();
            record
                .connections
                .retain(|_, bound| bound.id() != connection);
            if record.connections.len() < before {
                debug!(%game_id, "Unbound connection");
            }
        }
    }

    /// Forfeits every in-progress game whose turn-holder has been idle for
    /// at least `timeout`, returning the affected games.
    #[instrument(skip(self))]
    pub fn forfeit_idle(&self, now: Instant, timeout: Duration) -> Vec<GameId> {
        let mut forfeited = Vec::new();
        for (game_id, record) in self.records() {
            let mut record = record.lock();
            if record.session.phase() != Phase::InProgress
                || now.saturating_duration_since(record.last_activity) < timeout
            {
                continue;
            }
            let Some(loser) = record.session.state().turn() else {
                continue;
            };

            match record.session.forfeit(loser) {
                Ok(winner) => {
                    record.commit(None, now);
                    let event = ServerEvent::GameOver {
                        game_id: game_id.clone(),
                        winner,
                        reason: GameOverReason::Forfeit,
                    };
                    for participant in record.session.participants() {
                        record.notify(participant, event.clone());
                    }
                    info!(%game_id, %loser, %winner, "Forfeited idle game");
                    forfeited.push(game_id);
                }
                Err(err) => warn!(%game_id, error = %err, "Could not forfeit idle game"),
            }
        }
        forfeited
    }
}
