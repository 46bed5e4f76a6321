//! Revocation cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration for the revocation store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Whether revocation records are kept at all; `false` runs token
    /// verification in purely stateless mode
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Redis connection URL
    pub url: String,

    /// Username for Redis ACL authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for Redis authentication
    #[serde(default)]
    pub password: Option<String>,

    /// Redis database number (0-15)
    #[serde(default)]
    pub database: u8,

    /// Prefix prepended verbatim to every revocation key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Connection attempts made at startup before giving up
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: String::from("redis://localhost:6379"),
            username: None,
            password: None,
            database: 0,
            key_prefix: default_key_prefix(),
            connection_timeout: default_connection_timeout(),
            connect_retries: default_connect_retries(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("REDIS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enabled),
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            username: std::env::var("REDIS_USERNAME").ok(),
            password: std::env::var("REDIS_PASSWORD").ok(),
            database: std::env::var("REDIS_DATABASE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
                .min(15),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            ..defaults
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all revocation keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the database number
    pub fn with_database(mut self, db: u8) -> Self {
        self.database = db.min(15);
        self
    }

    /// Set ACL credentials
    pub fn with_credentials(
        mut self,
        username: Option<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username;
        self.password = Some(password.into());
        self
    }

    /// Build the revocation key for a token
    pub fn make_key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }
}

fn default_enabled() -> bool {
    true
}

fn default_key_prefix() -> String {
    String::from("tokenward:revoked:")
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_connect_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.database, 0);
        assert_eq!(config.key_prefix, "tokenward:revoked:");
    }

    #[test]
    fn test_cache_config_with_prefix() {
        let config = CacheConfig::new("redis://cache:6379")
            .with_prefix("svc:")
            .with_database(20);

        assert_eq!(config.make_key("abc.def.ghi"), "svc:abc.def.ghi");
        assert_eq!(config.database, 15);
    }

    #[test]
    fn test_cache_key_without_prefix() {
        let config = CacheConfig::default().with_prefix("");
        assert_eq!(config.make_key("abc"), "abc");
    }
}
