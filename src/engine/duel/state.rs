use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;

use super::errors::*;
use super::rules::{FIELD_SLOTS, HAND_LIMIT};
use super::types::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub hand: Vec<CardInstance>,
    pub field: [Option<CardInstance>; FIELD_SLOTS],
    /// Drawn from the end.
    pub deck: Vec<CardInstance>,
    pub meridian: Meridian,
    /// Only combat deaths decrement this; reaching zero loses the game.
    pub deck_count: u32,
    pub role: Role,
}

impl PlayerState {
    pub fn field_card(&self, slot: usize) -> Option<&CardInstance> {
        self.field.get(slot).and_then(Option::as_ref)
    }

    pub fn field_card_mut(&mut self, slot: usize) -> Option<&mut CardInstance> {
        self.field.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn occupied_slots(&self) -> usize {
        self.field.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Authoritative per-room state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub turn: u32,
    pub current_player: PlayerId,
    pub game_phase: Phase,
    pub winner: Option<PlayerId>,
    /// Seat order; index 0 moves first and completes each turn cycle.
    pub turn_order: [PlayerId; 2],
    pub players: BTreeMap<PlayerId, PlayerState>,
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(&id)
    }

    pub fn is_over(&self) -> bool {
        self.game_phase == Phase::Ended
    }
}

impl InvariantCheck for GameState {
    fn validate_invariants(&self) -> Result<(), StateError> {
        let seats: HashSet<_> = self.turn_order.iter().collect();
        if seats.len() != self.turn_order.len() {
            return Err(StateError::InvariantViolation("duplicate seat"));
        }
        if self.players.len() != self.turn_order.len()
            || self.turn_order.iter().any(|id| !self.players.contains_key(id))
        {
            return Err(StateError::InvariantViolation("seat without player state"));
        }
        if !seats.contains(&self.current_player) {
            return Err(StateError::InvariantViolation("current player not seated"));
        }
        if self.turn == 0 {
            return Err(StateError::InvariantViolation("turn starts at 1"));
        }
        if self.winner.is_some() != self.is_over() {
            return Err(StateError::InvariantViolation("winner without ended phase"));
        }
        for p in self.players.values() {
            if p.hand.len() > HAND_LIMIT {
                return Err(StateError::InvariantViolation("hand over limit"));
            }
            if p.meridian.current > p.meridian.max {
                return Err(StateError::InvariantViolation("meridian over max"));
            }
        }
        Ok(())
    }
}
