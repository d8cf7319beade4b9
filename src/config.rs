use std::time::Duration;

pub const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_ENDED_ROOM_GRACE: Duration = Duration::from_secs(30);
pub const DEFAULT_CODE_ATTEMPTS: usize = 1000;

/// Room lifetime knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LobbyConfig {
    /// Rooms untouched for longer than this are swept regardless of status.
    pub max_idle: Duration,
    pub sweep_interval: Duration,
    /// Delay between a game ending and its room being dropped.
    pub ended_room_grace: Duration,
    pub code_attempts: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            ended_room_grace: DEFAULT_ENDED_ROOM_GRACE,
            code_attempts: DEFAULT_CODE_ATTEMPTS,
        }
    }
}
