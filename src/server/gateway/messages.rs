use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::duel::{ActionKind, DiscardedCard, GameState, PlayerAction, PlayerId};
use crate::lobby::RoomCode;

use super::error::GatewayError;

pub type ClientId = Uuid;

/// Raw inbound frame. Client-stamped `playerId`/`gameRoom` are parsed but never trusted.
#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub room_code: Option<RoomCode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientRequest {
    JoinRoom(JoinRoomRequest),
    PlayerAction(PlayerAction),
    Ping,
}

impl ClientRequest {
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        let envelope: ClientEnvelope =
            serde_json::from_str(raw).map_err(|_| GatewayError::InvalidFormat)?;
        match envelope.kind.as_str() {
            "joinRoom" => {
                let request = match envelope.data {
                    Value::Null => JoinRoomRequest::default(),
                    data => serde_json::from_value(data).map_err(|_| GatewayError::InvalidFormat)?,
                };
                // An empty code means "create a room", same as omitting it.
                let room_code = request.room_code.filter(|code| !code.as_str().is_empty());
                Ok(ClientRequest::JoinRoom(JoinRoomRequest { room_code }))
            }
            "playerAction" => serde_json::from_value(envelope.data)
                .map(ClientRequest::PlayerAction)
                .map_err(|err| GatewayError::InvalidAction(err.to_string())),
            "ping" => Ok(ClientRequest::Ping),
            other => Err(GatewayError::UnknownType(other.to_owned())),
        }
    }
}

/// Echo of an accepted action: `{type, playerId, ...fields}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    #[serde(flatten)]
    pub action: PlayerAction,
    pub player_id: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Connected { client_id: ClientId },
    #[serde(rename_all = "camelCase")]
    PlayerAssigned {
        player_id: PlayerId,
        game_room: RoomCode,
    },
    RoomCode { code: RoomCode },
    #[serde(rename_all = "camelCase")]
    WaitingForOpponent {
        players_connected: usize,
        players_needed: usize,
    },
    #[serde(rename_all = "camelCase")]
    GameStart { game_state: GameState },
    #[serde(rename_all = "camelCase")]
    GameStateUpdate {
        game_state: GameState,
        action: ActionRecord,
        #[serde(skip_serializing_if = "Option::is_none")]
        discarded_card: Option<DiscardedCard>,
    },
    #[serde(rename_all = "camelCase")]
    ActionSuccess {
        #[serde(rename = "type")]
        kind: ActionKind,
        game_state: GameState,
    },
    OpponentConnected {},
    OpponentDisconnected {},
    #[serde(rename_all = "camelCase")]
    GameEnd {
        winner: PlayerId,
        final_game_state: GameState,
    },
    Error { message: String },
    Pong { timestamp: i64 },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn pong() -> Self {
        ServerMessage::Pong {
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Outbound frame: `{type, data, timestamp}` with a millisecond server stamp.
#[derive(Clone, Debug, Serialize)]
pub struct ServerEnvelope {
    #[serde(flatten)]
    pub message: ServerMessage,
    pub timestamp: i64,
}

impl ServerEnvelope {
    pub fn now(message: ServerMessage) -> Self {
        Self {
            message,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
