pub mod error;
pub mod hub;
pub mod messages;
pub mod socket;

pub use error::GatewayError;
pub use hub::{Frame, Gateway, Outbound};
pub use messages::{ClientId, ClientRequest, ServerEnvelope, ServerMessage};
pub use socket::ws_handler;
