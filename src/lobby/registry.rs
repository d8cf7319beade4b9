use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::config::LobbyConfig;
use crate::engine::duel::{Phase, PlayerId, Role};

use super::error::LobbyError;
use super::types::{RegistryStats, Room, RoomCode, RoomSummary};

const LOG_TARGET: &str = "lobby::registry";

/// Owns every live room plus a player to room index. Not synchronized; callers wrap it.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    player_rooms: HashMap<PlayerId, RoomCode>,
    config: LobbyConfig,
}

impl RoomRegistry {
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config,
        }
    }

    pub fn create_room<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoomCode, LobbyError> {
        for _ in 0..self.config.code_attempts {
            let code = RoomCode::random(rng);
            if self.rooms.contains_key(&code) {
                continue;
            }
            self.rooms.insert(code.clone(), Room::new(code.clone()));
            info!(target: LOG_TARGET, room = %code, "room created");
            return Ok(code);
        }
        Err(LobbyError::CodeSpaceExhausted)
    }

    /// Returns the room only if it exists and still has a free seat.
    pub fn join_room(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code).filter(|room| !room.is_full())
    }

    pub fn get_room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Runs `f` against the room and refreshes its activity stamp.
    pub fn with_room<F, T>(&mut self, code: &RoomCode, f: F) -> Option<T>
    where
        F: FnOnce(&mut Room) -> T,
    {
        let room = self.rooms.get_mut(code)?;
        room.touch();
        Some(f(room))
    }

    pub fn add_player(&mut self, code: &RoomCode, player: PlayerId) -> Result<Role, LobbyError> {
        if self.player_rooms.contains_key(&player) {
            return Err(LobbyError::AlreadyInRoom);
        }
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.clone()))?;
        let role = room.add_player(player)?;
        self.player_rooms.insert(player, code.clone());
        debug!(target: LOG_TARGET, room = %code, player_id = %player, ?role, "player seated");
        Ok(role)
    }

    pub fn player_room(&self, player: PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(&player)
    }

    /// Forgets the player's room association without touching the room itself.
    pub fn detach_player(&mut self, player: PlayerId) -> Option<RoomCode> {
        self.player_rooms.remove(&player)
    }

    pub fn remove_room(&mut self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.remove(code)?;
        for player in &room.players {
            if self.player_rooms.get(player) == Some(code) {
                self.player_rooms.remove(player);
            }
        }
        info!(target: LOG_TARGET, room = %code, status = ?room.status, "room removed");
        Some(room)
    }

    /// Drops every room idle for longer than the configured limit. Returns how many went.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let max_idle = self.config.max_idle;
        let expired: Vec<RoomCode> = self
            .rooms
            .values()
            .filter(|room| room.is_expired(now, max_idle))
            .map(|room| room.code.clone())
            .collect();
        for code in &expired {
            self.remove_room(code);
        }
        if !expired.is_empty() {
            info!(
                target: LOG_TARGET,
                removed = expired.len(),
                remaining = self.rooms.len(),
                "swept idle rooms"
            );
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.rooms
            .values()
            .fold(RegistryStats::default(), |mut stats, room| {
                stats.total_rooms += 1;
                stats.total_players += room.player_count();
                match room.status {
                    Phase::Playing => stats.active_rooms += 1,
                    Phase::Waiting => stats.waiting_rooms += 1,
                    Phase::Ended => {}
                }
                stats
            })
    }

    pub fn summaries(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self.rooms.values().map(Room::summary).collect();
        rooms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.code.cmp(&b.code)));
        rooms
    }

    #[cfg(test)]
    pub(crate) fn insert_room(&mut self, room: Room) {
        self.rooms.insert(room.code.clone(), room);
    }
}
