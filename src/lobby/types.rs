use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::duel::{GameState, Phase, PlayerId, Role};

use super::error::LobbyError;

pub const MAX_PLAYERS: usize = 2;

/// Four digit share code, unique among live rooms.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(1000..=9999u16).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct Room {
    pub code: RoomCode,
    /// Join order; index 0 is the first seat.
    pub players: Vec<PlayerId>,
    pub status: Phase,
    pub game_state: Option<GameState>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    last_activity: Instant,
}

impl Room {
    pub fn new(code: RoomCode) -> Self {
        let now = Utc::now();
        Self {
            code,
            players: Vec::with_capacity(MAX_PLAYERS),
            status: Phase::Waiting,
            game_state: None,
            created_at: now,
            last_activity_at: now,
            last_activity: Instant::now(),
        }
    }

    pub fn add_player(&mut self, player: PlayerId) -> Result<Role, LobbyError> {
        if self.players.contains(&player) {
            return Err(LobbyError::AlreadyInRoom);
        }
        if self.is_full() {
            return Err(LobbyError::RoomFull);
        }
        self.players.push(player);
        self.touch();
        Ok(Role::for_seat(self.players.len() - 1))
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.players.iter().copied().find(|id| *id != player)
    }

    /// Seats in join order, once both are filled.
    pub fn seats(&self) -> Option<[PlayerId; 2]> {
        match self.players.as_slice() {
            [first, second] => Some([*first, *second]),
            _ => None,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
        self.last_activity_at = Utc::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    pub fn is_expired(&self, now: Instant, max_idle: Duration) -> bool {
        self.idle_for(now) > max_idle
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            code: self.code.clone(),
            player_count: self.players.len(),
            status: self.status,
            created_at: self.created_at,
            last_activity: self.last_activity_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub code: RoomCode,
    pub player_count: usize,
    pub status: Phase,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_rooms: usize,
    pub active_rooms: usize,
    pub waiting_rooms: usize,
    pub total_players: usize,
}
