//! Domain layer containing the token model.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
