use crate::engine::duel::ActionError;
use crate::lobby::LobbyError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid message format")]
    InvalidFormat,
    #[error("Unknown message type: {0}")]
    UnknownType(String),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Not in a valid game room")]
    NotInRoom,
    #[error(transparent)]
    Lobby(#[from] LobbyError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("Failed to join room")]
    JoinFailed(&'static str),
    /// Logged with its detail; clients only see the generic text.
    #[error("Failed to process action")]
    Internal(&'static str),
}
