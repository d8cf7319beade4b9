pub mod actions;
pub mod engine;
pub mod errors;
pub mod events;
pub mod rules;
pub mod seating;
pub mod state;
pub mod types;

pub use actions::*;
pub use engine::*;
pub use errors::*;
pub use events::*;
pub use rules::*;
pub use seating::*;
pub use state::*;
pub use types::*;

#[cfg(test)]
mod tests;
