pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod routes;

pub use bootstrap::{run_server, serve, ServerConfig};
pub use gateway::Gateway;
pub use routes::EldritchServer;
