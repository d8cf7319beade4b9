pub mod error;
pub mod registry;
pub mod types;

pub use error::LobbyError;
pub use registry::RoomRegistry;
pub use types::*;
