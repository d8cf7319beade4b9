use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::lobby::{RegistryStats, RoomSummary};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Rooms with a game in progress.
    pub active_rooms: usize,
    pub connected_players: usize,
}

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub stats: RegistryStats,
    pub rooms: Vec<RoomSummary>,
}
