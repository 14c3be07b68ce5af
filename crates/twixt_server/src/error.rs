//! Error types for the session registry and relay.

use crate::registry::GameId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use twixt_core::{ParticipantId, SessionError};

/// Wire-level category of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// The message did not have the expected shape.
    #[display("malformed-payload")]
    MalformedPayload,
    /// The referenced game does not exist.
    #[display("game-not-found")]
    GameNotFound,
    /// The game already has two participants.
    #[display("game-full")]
    GameFull,
    /// No opponent is seated or connected.
    #[display("opponent-unavailable")]
    OpponentUnavailable,
    /// The move or actor is not allowed right now.
    #[display("illegal-move")]
    IllegalMove,
}

/// A rejected registry operation. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RelayError {
    /// The message did not have the expected shape.
    #[display("malformed payload: {}", _0)]
    MalformedPayload(String),

    /// The referenced game does not exist.
    #[display("game {} not found", _0)]
    GameNotFound(GameId),

    /// The game already has two participants.
    #[display("game {} already has two participants", _0)]
    GameFull(GameId),

    /// No opponent is seated, or their connection is gone.
    #[display("opponent unavailable in game {}", _0)]
    OpponentUnavailable(GameId),

    /// The acting participant does not belong to the game.
    #[display("{} is not a participant in game {}", participant, game)]
    NotParticipant {
        /// Game the participant tried to act in.
        game: GameId,
        /// The unknown participant.
        participant: ParticipantId,
    },

    /// The move was rejected by the game rules.
    #[display("illegal move: {}", _0)]
    IllegalMove(String),
}

impl std::error::Error for RelayError {}

impl RelayError {
    /// Maps a session error into the relay's terms.
    pub fn from_session(game: &GameId, err: SessionError) -> Self {
        match err {
            SessionError::GameFull => RelayError::GameFull(game.clone()),
            SessionError::NotSeated(participant) => RelayError::NotParticipant {
                game: game.clone(),
                participant,
            },
            SessionError::AwaitingPlayers => RelayError::OpponentUnavailable(game.clone()),
            SessionError::InvalidSnapshot(reason) => RelayError::MalformedPayload(reason),
            SessionError::Move(err) => RelayError::IllegalMove(err.to_string()),
        }
    }

    /// Wire category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            RelayError::GameNotFound(_) => ErrorKind::GameNotFound,
            RelayError::GameFull(_) => ErrorKind::GameFull,
            RelayError::OpponentUnavailable(_) => ErrorKind::OpponentUnavailable,
            RelayError::NotParticipant { .. } | RelayError::IllegalMove(_) => {
                ErrorKind::IllegalMove
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::MalformedPayload => StatusCode::BAD_REQUEST,
            ErrorKind::GameNotFound => StatusCode::NOT_FOUND,
            ErrorKind::GameFull | ErrorKind::OpponentUnavailable => StatusCode::CONFLICT,
            ErrorKind::IllegalMove => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Error body returned over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twixt_core::MoveError;

    #[test]
    fn test_session_errors_map_to_kinds() {
        let game = GameId::from("g1".to_string());
        assert_eq!(
            RelayError::from_session(&game, SessionError::GameFull).kind(),
            ErrorKind::GameFull
        );
        assert_eq!(
            RelayError::from_session(&game, SessionError::AwaitingPlayers).kind(),
            ErrorKind::OpponentUnavailable
        );
        assert_eq!(
            RelayError::from_session(&game, MoveError::GameOver.into()).kind(),
            ErrorKind::IllegalMove
        );
        assert_eq!(
            RelayError::from_session(&game, SessionError::NotSeated("x".into())).kind(),
            ErrorKind::IllegalMove
        );
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::OpponentUnavailable).unwrap(),
            "\"opponent-unavailable\""
        );
        assert_eq!(ErrorKind::GameNotFound.to_string(), "game-not-found");
    }
}
