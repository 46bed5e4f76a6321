//! Revocation store trait defining the interface for revocation records.

use async_trait::async_trait;
use std::time::Duration;

use crate::context::RequestContext;
use crate::errors::StoreError;

/// Store of revoked tokens, keyed by the token string
///
/// A record only has to live as long as the token it names: once the token
/// has expired it fails verification on its own, so implementations are
/// expected to let records lapse after `ttl`.
///
/// Every operation takes the caller's [`RequestContext`] and must give up
/// with [`StoreError::DeadlineExceeded`] once its deadline has passed.
/// Implementations must not retry internally.
///
/// # Consistency
/// A `set` followed by a `check` on the same instance must observe the
/// record. Nothing stronger is required across instances.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token` as revoked for `ttl`
    ///
    /// Writing an existing key replaces its TTL.
    async fn set(&self, ctx: &RequestContext, token: &str, ttl: Duration)
        -> Result<(), StoreError>;

    /// Remove the record for `token`
    ///
    /// # Returns
    /// * `Ok(true)` - A record existed and was removed
    /// * `Ok(false)` - No record existed
    async fn delete(&self, ctx: &RequestContext, token: &str) -> Result<bool, StoreError>;

    /// Whether an unexpired record exists for `token`
    async fn check(&self, ctx: &RequestContext, token: &str) -> Result<bool, StoreError>;

    /// Release the backend connection
    ///
    /// Calling `close` more than once must be harmless.
    async fn close(&self) -> Result<(), StoreError>;
}
