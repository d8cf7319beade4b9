pub mod catalog;
pub mod deck;

pub use catalog::*;
pub use deck::*;
