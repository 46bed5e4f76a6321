//! Redis cache client implementation
//!
//! This module provides a Redis client with startup retry logic and the
//! handful of commands revocation records need: set with expiry, exists
//! and delete. Commands are not retried; callers bound them with their own
//! deadline.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, ConnectionInfo, IntoConnectionInfo};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::CacheConfig;
use crate::InfrastructureError;

/// Base delay between connection attempts; doubles per attempt, capped at 5s
const CONNECT_RETRY_DELAY_MS: u64 = 100;

/// Redis cache client over a multiplexed connection
///
/// The connection is shared by every caller. [`RedisClient::close`] drops it;
/// later commands fail with [`InfrastructureError::Closed`].
pub struct RedisClient {
    /// Redis multiplexed connection, `None` once closed
    connection: RwLock<Option<MultiplexedConnection>>,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("url", &mask_url(&self.config.url))
            .field("database", &self.config.database)
            .finish()
    }
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// Makes up to `config.connect_retries` connection attempts, each
    /// bounded by `config.connection_timeout` seconds.
    ///
    /// # Example
    /// ```no_run
    /// use tw_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379").with_database(2);
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            database = config.database,
            "Creating Redis client"
        );

        let client = Client::open(connection_info(&config)?).map_err(|e| {
            error!("Failed to open Redis client: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            config.connect_retries.max(1),
            Duration::from_secs(config.connection_timeout.max(1)),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection: RwLock::new(Some(connection)),
            config,
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_attempts: u32,
        attempt_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = CONNECT_RETRY_DELAY_MS;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result =
                match tokio::time::timeout(attempt_timeout, client.get_multiplexed_async_connection())
                    .await
                {
                    Ok(Ok(connection)) => Ok(connection),
                    Ok(Err(e)) => Err(InfrastructureError::Cache(e)),
                    Err(_) => Err(InfrastructureError::Timeout(attempt_timeout.as_secs())),
                };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_attempts => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// A handle on the shared connection
    async fn connection(&self) -> Result<MultiplexedConnection, InfrastructureError> {
        self.connection
            .read()
            .await
            .clone()
            .ok_or(InfrastructureError::Closed)
    }

    /// Set a value with expiration time
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Value to store
    /// * `expiry_seconds` - Time to live in seconds
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!(expiry_seconds, "Setting key with expiry");

        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, expiry_seconds)
            .await
            .map_err(|e| {
                error!("Failed to set key: {}", e);
                InfrastructureError::Cache(e)
            })
    }

    /// Check if a key exists in cache
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection().await?;
        conn.exists::<_, bool>(key).await.map_err(|e| {
            error!("Failed to check key existence: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key from cache
    ///
    /// # Returns
    /// * `Ok(true)` - The key existed and was deleted
    /// * `Ok(false)` - The key was not found
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection().await?;
        let deleted_count = conn.del::<_, u32>(key).await.map_err(|e| {
            error!("Failed to delete key: {}", e);
            InfrastructureError::Cache(e)
        })?;

        Ok(deleted_count > 0)
    }

    /// Drop the connection; safe to call more than once
    pub async fn close(&self) {
        if self.connection.write().await.take().is_some() {
            info!("Redis connection closed");
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.connection.read().await.is_none()
    }
}

/// Connection settings from the URL, with explicit credentials and database
/// taking precedence over whatever the URL carries
pub(crate) fn connection_info(config: &CacheConfig) -> Result<ConnectionInfo, InfrastructureError> {
    let mut info = config.url.as_str().into_connection_info().map_err(|e| {
        error!("Failed to parse Redis URL: {}", e);
        InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
    })?;

    if config.database != 0 {
        info.redis.db = i64::from(config.database);
    }
    if config.username.is_some() {
        info.redis.username = config.username.clone();
    }
    if config.password.is_some() {
        info.redis.password = config.password.clone();
    }
    Ok(info)
}

/// Mask sensitive parts of Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
