use serde::{Deserialize, Serialize};

/// Player-submitted action, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerAction {
    #[serde(rename_all = "camelCase")]
    PlayCard { hand_index: usize, field_slot: usize },
    #[serde(rename_all = "camelCase")]
    Attack {
        attacker_slot: usize,
        // absent => declared attack with no resolution
        #[serde(default)]
        target_slot: Option<usize>,
    },
    EndTurn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    PlayCard,
    Attack,
    EndTurn,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::PlayCard { .. } => ActionKind::PlayCard,
            PlayerAction::Attack { .. } => ActionKind::Attack,
            PlayerAction::EndTurn => ActionKind::EndTurn,
        }
    }
}
