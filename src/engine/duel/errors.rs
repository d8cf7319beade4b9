/// Validation failures. The display text is sent verbatim to the acting client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Game not initialized")]
    GameNotStarted,
    #[error("Game is not in playing state")]
    GameNotInProgress,
    #[error("Not your turn")]
    NotPlayersTurn,
    #[error("Player is not part of this game")]
    UnknownPlayer,
    #[error("Invalid card")]
    InvalidHandIndex { index: usize },
    #[error("Invalid field slot")]
    InvalidFieldSlot { slot: usize },
    #[error("Not enough Meridian")]
    InsufficientMeridian { cost: u32, available: u32 },
    #[error("No card in attacker slot")]
    EmptyAttackerSlot { slot: usize },
    #[error("Card cannot attack the turn it was played (summoning sickness)")]
    SummoningSickness { slot: usize },
    #[error("No target card")]
    MissingTarget { slot: usize },
}

#[derive(Debug, PartialEq, Eq)]
pub enum StateError {
    InvariantViolation(&'static str),
}

pub trait InvariantCheck {
    fn validate_invariants(&self) -> Result<(), StateError>;
}
