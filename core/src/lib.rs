//! # Tokenward Core
//!
//! Token issuance, verification and revocation for Tokenward.
//! This crate contains the token model, the authenticator, the revocation
//! store interface and the error types shared by the outer layers.

pub mod clock;
pub mod context;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::RequestContext;
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
