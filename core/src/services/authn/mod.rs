//! Token authentication module
//!
//! This module handles issuing, verifying and revoking signed tokens:
//! - Signing tokens for a subject with the configured algorithm and key
//! - Verifying structure, algorithm, signature and validity window
//! - Revoking tokens through an optional revocation store

mod config;
mod keys;
mod service;

#[cfg(test)]
mod tests;

pub use config::{SigningConfig, SigningConfigBuilder, DEFAULT_LIFETIME};
pub use keys::{KeyFamily, KeyMaterial, KeyResolver, StaticKeyResolver};
pub use service::JwtAuthenticator;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::domain::entities::token::{Claims, IssuedToken};
use crate::errors::TokenError;

/// Issues, verifies and revokes bearer tokens
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Issue a token for `subject`
    async fn sign(&self, ctx: &RequestContext, subject: &str) -> Result<IssuedToken, TokenError>;

    /// Verify `token` and return its claims
    ///
    /// Fails with [`TokenError::Revoked`] when the token was destroyed, and
    /// with [`TokenError::StoreFailure`] when revocation could not be checked.
    async fn parse_claims(&self, ctx: &RequestContext, token: &str) -> Result<Claims, TokenError>;

    /// Revoke `token` until it expires
    async fn destroy(&self, ctx: &RequestContext, token: &str) -> Result<(), TokenError>;

    /// Release the revocation store; repeated calls are no-ops
    async fn release(&self) -> Result<(), TokenError>;
}
