//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for Tokenward. It provides
//! the Redis client and the Redis-backed revocation store used by the
//! authenticator in `tw_core`.

// Re-export core types for convenience
pub use tw_core::errors::*;

/// Cache module - Redis client and revocation store
pub mod cache;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection attempt did not finish in time
    #[error("Connection timed out after {0}s")]
    Timeout(u64),

    /// The client was closed
    #[error("Connection closed")]
    Closed,
}

impl From<InfrastructureError> for StoreError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Closed => StoreError::Closed,
            other => StoreError::backend(other),
        }
    }
}
