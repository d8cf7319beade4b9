pub mod cards;
pub mod config;
pub mod engine;
pub mod lobby;
pub mod server;
pub mod tokio_tools;

#[cfg(test)]
pub mod test_utils;

pub use cards::{CardCatalog, CardDefinition, CardInstance};
pub use config::LobbyConfig;
pub use engine::duel::{DuelEngine, DuelRules, GameState, PlayerAction};
