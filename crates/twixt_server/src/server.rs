//! HTTP routes and the WebSocket message loop.

use crate::connection::Connection;
use crate::error::RelayError;
use crate::protocol::{ClientMessage, GameOverReason, ServerEvent};
use crate::registry::{GameId, HistoryEntry, Registry, TurnReceipt};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, instrument, warn};
use twixt_core::GameState;

/// Builds the application router over `registry`.
pub fn router(registry: Registry) -> Router {
    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/creategame", post(create_game))
        .route("/games/{id}", get(game_state))
        .route("/games/{id}/history", get(game_history))
        .route("/health", get(health))
        .with_state(registry)
}

#[instrument(skip(registry))]
async fn create_game(State(registry): State<Registry>) -> Json<GameId> {
    Json(registry.create_game())
}

#[instrument(skip(registry))]
async fn game_state(
    State(registry): State<Registry>,
    Path(id): Path<String>,
) -> Result<Json<GameState>, RelayError> {
    registry.latest(&GameId::from(id)).map(Json)
}

#[instrument(skip(registry))]
async fn game_history(
    State(registry): State<Registry>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, RelayError> {
    registry.history(&GameId::from(id)).map(Json)
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(registry): State<Registry>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

#[instrument(skip_all)]
async fn handle_socket(socket: WebSocket, registry: Registry) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (connection, mut events) = Connection::open();
    info!(connection = connection.id(), "Peer connected");

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = ws_rx.next().await {
        match message {
            Message::Text(text) => {
                for event in dispatch(&registry, &connection, text.as_str()) {
                    connection.send(event);
                }
            }
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    registry.unbind_connection(connection.id());
    info!(connection = connection.id(), "Peer disconnected");
}

/// Handles one text frame from `connection`, returning the replies for it.
///
/// Events for other participants are routed through the registry.
pub fn dispatch(registry: &Registry, connection: &Connection, text: &str) -> Vec<ServerEvent> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            let err = RelayError::MalformedPayload(e.to_string());
            warn!(error = %err, "Rejected frame");
            return vec![ServerEvent::from(&err)];
        }
    };
    debug!(?message, "Dispatching");

    let result = match message {
        ClientMessage::CreateGame => Ok(vec![ServerEvent::GameCreated {
            game_id: registry.create_game(),
        }]),
        ClientMessage::JoinGame { game_id, player_id } => registry
            .join_game(&game_id, player_id, Some(connection.clone()))
            .map(|joined| {
                vec![ServerEvent::Joined {
                    game_id,
                    seat: joined.seat,
                    state: joined.state,
                }]
            }),
        ClientMessage::EndTurn {
            game_id,
            player_id,
            state,
        } => registry
            .end_turn(&game_id, &player_id, state)
            .map(|receipt| turn_replies(game_id, receipt)),
        ClientMessage::PlacePeg {
            game_id,
            player_id,
            node,
        } => registry
            .place_peg(&game_id, &player_id, node)
            .map(|receipt| turn_replies(game_id, receipt)),
        ClientMessage::Sync { game_id } => registry
            .latest(&game_id)
            .map(|state| vec![ServerEvent::State { game_id, state }]),
    };

    result.unwrap_or_else(|err| {
        warn!(error = %err, "Request rejected");
        vec![ServerEvent::from(&err)]
    })
}

fn turn_replies(game_id: GameId, receipt: TurnReceipt) -> Vec<ServerEvent> {
    let winner = receipt.state.winner();
    let mut replies = vec![ServerEvent::TurnAccepted {
        game_id: game_id.clone(),
        state: receipt.state,
    }];
    if let Some(winner) = winner {
        replies.push(ServerEvent::GameOver {
            game_id: game_id.clone(),
            winner,
            reason: GameOverReason::Connected,
        });
    }
    if !receipt.relayed {
        replies.push(ServerEvent::from(&RelayError::OpponentUnavailable(game_id)));
    }
    replies
}
