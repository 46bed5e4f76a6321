//! Redis-backed revocation store
//!
//! Each revoked token becomes `SET <prefix><token> "1" EX <ttl>`, so Redis
//! drops the record on its own once the token would have expired anyway.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use tw_core::context::RequestContext;
use tw_core::errors::StoreError;
use tw_core::repositories::RevocationStore;

use super::{CacheConfig, RedisClient};
use crate::InfrastructureError;

/// Sentinel stored for every revoked token
const REVOKED: &str = "1";

/// Revocation store over a shared [`RedisClient`]
#[derive(Debug)]
pub struct RedisRevocationStore {
    client: RedisClient,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Connect to Redis and wrap the client
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Ok(Self::new(RedisClient::new(config).await?))
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key(&self, token: &str) -> String {
        self.client.config().make_key(token)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn set(&self, ctx: &RequestContext, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let seconds = expiry_seconds(ttl);
        debug!(ttl_secs = seconds, "Recording revocation");

        ctx.run(async {
            self.client
                .set_with_expiry(&self.key(token), REVOKED, seconds)
                .await
                .map_err(StoreError::from)
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, token: &str) -> Result<bool, StoreError> {
        ctx.run(async { self.client.delete(&self.key(token)).await.map_err(StoreError::from) })
            .await
    }

    async fn check(&self, ctx: &RequestContext, token: &str) -> Result<bool, StoreError> {
        ctx.run(async { self.client.exists(&self.key(token)).await.map_err(StoreError::from) })
            .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.close().await;
        Ok(())
    }
}

/// Redis expiry in whole seconds, rounded up and never below one
///
/// `EX 0` is an error in Redis, and rounding down could drop the record a
/// fraction of a second before its token expires.
pub(crate) fn expiry_seconds(ttl: Duration) -> u64 {
    let seconds = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    seconds.max(1)
}
