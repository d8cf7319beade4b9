use serde::{Deserialize, Serialize};

use crate::cards::InstanceId;

use super::types::PlayerId;

/// Opponent-visible "hand full" notice emitted when a draw is burned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardedCard {
    pub player_id: PlayerId,
    pub card_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CardPlayed {
        player: PlayerId,
        card: InstanceId,
        slot: usize,
        cost: u32,
    },
    AttackDeclared {
        player: PlayerId,
        attacker_slot: usize,
    },
    CombatResolved {
        attacker_slot: usize,
        target_slot: usize,
        attacker_health: i32,
        defender_health: i32,
    },
    CardDestroyed {
        owner: PlayerId,
        slot: usize,
        card: InstanceId,
        deck_count: u32,
    },
    TurnPassed {
        from: PlayerId,
        to: PlayerId,
        turn: u32,
    },
    CardDrawn {
        player: PlayerId,
    },
    CardDiscarded(DiscardedCard),
    GameWon {
        winner: PlayerId,
    },
}
