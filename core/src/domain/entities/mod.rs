//! Domain entities representing the token model.

pub mod token;


pub use token::{Claims, IssuedToken, TokenState, DEFAULT_TOKEN_TYPE};
