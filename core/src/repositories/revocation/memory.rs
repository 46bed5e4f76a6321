//! In-process implementation of RevocationStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::context::RequestContext;
use crate::errors::StoreError;

use super::r#trait::RevocationStore;

/// Revocation store held in process memory
///
/// Records expire lazily: an expired record reads as absent and is dropped
/// by the next write to it or by [`MemoryRevocationStore::purge_expired`].
/// Suitable for tests and single-process deployments; records do not
/// survive a restart and are not shared between processes.
#[derive(Debug)]
pub struct MemoryRevocationStore {
    pub(super) records: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    prefix: String,
    clock: Arc<dyn Clock>,
    closed: AtomicBool,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store that reads time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            prefix: String::new(),
            clock,
            closed: AtomicBool::new(false),
        }
    }

    /// Prepend `prefix` to every key
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn key(&self, token: &str) -> String {
        format!("{}{}", self.prefix, token)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    /// Drop every expired record, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, expires_at| *expires_at > now);
        before - records.len()
    }

    /// Number of records held, expired ones included until purged
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn set(&self, ctx: &RequestContext, token: &str, ttl: Duration) -> Result<(), StoreError> {
        self.ensure_open()?;
        let ttl = chrono::Duration::from_std(ttl).map_err(StoreError::backend)?;
        let expires_at = self.clock.now() + ttl;
        let key = self.key(token);

        ctx.run(async {
            self.records.write().await.insert(key, expires_at);
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, token: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let now = self.clock.now();
        let key = self.key(token);

        ctx.run(async {
            let removed = self.records.write().await.remove(&key);
            Ok(removed.is_some_and(|expires_at| expires_at > now))
        })
        .await
    }

    async fn check(&self, ctx: &RequestContext, token: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let now = self.clock.now();
        let key = self.key(token);

        ctx.run(async {
            let records = self.records.read().await;
            Ok(records
                .get(&key)
                .is_some_and(|expires_at| *expires_at > now))
        })
        .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.records.write().await.clear();
        }
        Ok(())
    }
}
