//! Configuration module with sub-modules per concern
//!
//! - `auth` - token signing and verification
//! - `cache` - Redis revocation store
//! - `environment` - environment detection and logging
//! - `server` - HTTP server

pub mod auth;
pub mod cache;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, DEFAULT_JWT_SECRET};
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Revocation store configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Defaults appropriate for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        Self::from_env_for(Environment::from_env())
    }

    /// Defaults for `environment` overridden by the plain environment
    /// variables (`JWT_SECRET`, `REDIS_URL`, `SERVER_PORT`, ...)
    pub fn from_env_for(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            cache: CacheConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_for_production() {
        let config = AppConfig::for_environment(Environment::Production);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.auth.jwt.expiry_seconds, 7200);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_app_config_deserialize_partial() {
        let json = serde_json::json!({
            "environment": "staging",
            "auth": { "jwt": { "issuer": "svc", "secret": "s" } },
            "cache": { "url": "redis://cache:6379", "enabled": false }
        });
        let config: AppConfig = serde_json::from_value(json).unwrap();

        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.auth.jwt.issuer, "svc");
        assert_eq!(config.auth.store_timeout_ms, 500);
        assert!(!config.cache.enabled);
        assert_eq!(config.server.port, 8080);
    }
}
