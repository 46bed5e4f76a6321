//! Cache module for Redis-backed revocation records
//!
//! This module provides the Redis client with startup retry logic and the
//! revocation store built on top of it.

pub mod redis_client;
pub mod revocation_store;


pub use redis_client::RedisClient;
pub use revocation_store::RedisRevocationStore;

// Re-export commonly used types
pub use tw_shared::config::CacheConfig;
