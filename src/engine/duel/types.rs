use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection-scoped identity; the gateway reuses the client id as the player id.
pub type PlayerId = Uuid;

/// Lifecycle shared by rooms and the game they host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Playing,
    Ended,
}

/// Positional role: the first occupant of a room is `player`, the second `opponent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Opponent,
}

impl Role {
    pub fn for_seat(seat: usize) -> Self {
        if seat == 0 {
            Role::Player
        } else {
            Role::Opponent
        }
    }
}

/// Per-player resource pool spent to play cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meridian {
    pub current: u32,
    pub max: u32,
}

impl Meridian {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }
}
