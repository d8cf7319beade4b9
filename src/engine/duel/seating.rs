use super::state::GameState;
use super::types::PlayerId;

/// Outcome of passing the turn in the fixed two-seat rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    pub next: PlayerId,
    /// True when the rotation wrapped back to the first seat.
    pub completed_cycle: bool,
}

pub trait Seating {
    fn seat_of(&self, player: PlayerId) -> Option<usize>;
    fn opponent_of(&self, player: PlayerId) -> Option<PlayerId>;
    fn next_to_act(&self, from: PlayerId) -> Option<Rotation>;
}

impl Seating for GameState {
    fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.turn_order.iter().position(|id| *id == player)
    }

    fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.seat_of(player)
            .map(|seat| self.turn_order[(seat + 1) % self.turn_order.len()])
    }

    fn next_to_act(&self, from: PlayerId) -> Option<Rotation> {
        let seat = self.seat_of(from)?;
        let next_seat = (seat + 1) % self.turn_order.len();
        Some(Rotation {
            next: self.turn_order[next_seat],
            completed_cycle: next_seat == 0,
        })
    }
}
