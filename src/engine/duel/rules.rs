use crate::cards::DECK_SIZE;

use super::seating::Seating;
use super::state::GameState;
use super::types::PlayerId;

pub const HAND_LIMIT: usize = 4;
pub const FIELD_SLOTS: usize = 4;
pub const OPENING_HAND: usize = 4;
pub const STARTING_MERIDIAN: u32 = 3;
pub const MERIDIAN_CAP: u32 = 10;
pub const STARTING_DECK_COUNT: u32 = DECK_SIZE as u32;

/// Meridian granted at the start of a turn: grows with the shared turn counter, capped.
pub fn meridian_for_turn(turn: u32) -> u32 {
    turn.saturating_add(2).min(MERIDIAN_CAP)
}

/// Deck depletion is the only way to lose. Seats are scanned in turn order, so if both
/// players are depleted at once the second seat is awarded the win.
pub fn deck_depletion_winner(state: &GameState) -> Option<PlayerId> {
    state
        .turn_order
        .iter()
        .copied()
        .find(|id| {
            state
                .players
                .get(id)
                .map(|p| p.deck_count == 0)
                .unwrap_or(false)
        })
        .and_then(|loser| state.opponent_of(loser))
}
