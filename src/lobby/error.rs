use super::types::RoomCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    #[error("Room is full")]
    RoomFull,
    #[error("Player already in room")]
    AlreadyInRoom,
    #[error("Room {0} not found or full")]
    RoomUnavailable(RoomCode),
    #[error("Room {0} not found")]
    RoomNotFound(RoomCode),
    #[error("Unable to generate unique room code")]
    CodeSpaceExhausted,
}
