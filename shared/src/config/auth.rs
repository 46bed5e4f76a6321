//! Token signing configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Development-only signing secret used when nothing else is configured
pub const DEFAULT_JWT_SECRET: &str = "tokenward-development-secret-change-me";

/// JWT signing and verification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Algorithm name (HS256, HS384, HS512, RS256, ..., ES256, EdDSA)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Shared secret for HMAC algorithms
    #[serde(default = "default_secret")]
    pub secret: String,

    /// PEM private key for asymmetric algorithms
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// PEM public key for asymmetric algorithms
    #[serde(default)]
    pub public_key_path: Option<String>,

    /// JWT issuer claim
    #[serde(default)]
    pub issuer: String,

    /// Token lifetime in seconds
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: i64,

    /// Type label returned to clients alongside the token
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Tolerated clock skew when checking nbf/exp, in seconds
    #[serde(default)]
    pub leeway_seconds: u64,

    /// Extra fields stamped on every token header
    #[serde(default)]
    pub header: BTreeMap<String, serde_json::Value>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            secret: default_secret(),
            private_key_path: None,
            public_key_path: None,
            issuer: String::new(),
            expiry_seconds: default_expiry_seconds(),
            token_type: default_token_type(),
            leeway_seconds: 0,
            header: BTreeMap::new(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set token lifetime in minutes
    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.expiry_seconds = minutes * 60;
        self
    }

    /// Use an asymmetric algorithm with PEM key files
    pub fn with_key_files(
        mut self,
        algorithm: impl Into<String>,
        private_key_path: impl Into<String>,
        public_key_path: impl Into<String>,
    ) -> Self {
        self.algorithm = algorithm.into();
        self.private_key_path = Some(private_key_path.into());
        self.public_key_path = Some(public_key_path.into());
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.algorithm.starts_with("HS") && self.secret == DEFAULT_JWT_SECRET
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH").ok(),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH").ok(),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            expiry_seconds: std::env::var("JWT_EXPIRY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expiry_seconds),
            token_type: std::env::var("JWT_TOKEN_TYPE").unwrap_or(defaults.token_type),
            leeway_seconds: std::env::var("JWT_LEEWAY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            header: BTreeMap::new(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Upper bound for a single revocation store round trip, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            store_timeout_ms: std::env::var("AUTH_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_store_timeout_ms),
        }
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_secret() -> String {
    String::from(DEFAULT_JWT_SECRET)
}

fn default_expiry_seconds() -> i64 {
    7200 // 2 hours
}

fn default_token_type() -> String {
    String::from("Bearer")
}

fn default_store_timeout_ms() -> u64 {
    500
}
