//! Shared configuration and common types for Tokenward
//!
//! This crate provides functionality used across all workspace crates:
//! - Configuration records (JWT signing, revocation cache, server, logging)
//! - The error body returned to HTTP clients
//! - Language detection for localized messages

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::Language;
