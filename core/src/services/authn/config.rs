//! Signing configuration for the authenticator

use jsonwebtoken::Algorithm;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tw_shared::config::{JwtConfig, DEFAULT_JWT_SECRET};

use crate::domain::entities::token::DEFAULT_TOKEN_TYPE;
use crate::errors::{DomainError, DomainResult};

use super::keys::{KeyFamily, KeyMaterial, KeyResolver, StaticKeyResolver};

/// Default token lifetime (2 hours)
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

/// Header fields owned by the signer; extra header fields may not replace them
const RESERVED_HEADER_FIELDS: [&str; 2] = ["alg", "typ"];

/// Immutable signing configuration
///
/// Only constructed through [`SigningConfigBuilder::build`] or
/// [`SigningConfig::from_jwt_config`], both of which validate, so a value of
/// this type always describes keys that match its algorithm.
#[derive(Clone)]
pub struct SigningConfig {
    algorithm: Algorithm,
    key: KeyMaterial,
    resolver: Option<Arc<dyn KeyResolver>>,
    issuer: String,
    lifetime: Duration,
    token_type: String,
    leeway: u64,
    header: Map<String, Value>,
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("algorithm", &self.algorithm)
            .field("key", &self.key)
            .field("custom_resolver", &self.resolver.is_some())
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .field("token_type", &self.token_type)
            .field("leeway", &self.leeway)
            .field("header", &self.header)
            .finish()
    }
}

impl SigningConfig {
    pub fn builder() -> SigningConfigBuilder {
        SigningConfigBuilder::default()
    }

    /// Builds a signing configuration from the deployment settings
    ///
    /// HMAC algorithms use `secret`; every other algorithm loads the PEM
    /// files named by `private_key_path` and `public_key_path`.
    pub fn from_jwt_config(config: &JwtConfig) -> DomainResult<Self> {
        let algorithm: Algorithm = config.algorithm.parse().map_err(|_| {
            DomainError::configuration(format!("Unknown JWT algorithm: {}", config.algorithm))
        })?;

        let key = if KeyFamily::of(algorithm) == KeyFamily::Hmac {
            if config.is_using_default_secret() {
                tracing::warn!("Using the default JWT secret; set JWT_SECRET or TOKENWARD__AUTH__JWT__SECRET before deploying");
            }
            KeyMaterial::secret(&config.secret)
        } else {
            match (&config.private_key_path, &config.public_key_path) {
                (Some(private), Some(public)) => KeyMaterial::from_pem_files(private, public)?,
                _ => {
                    return Err(DomainError::configuration(format!(
                        "{} requires both private_key_path and public_key_path",
                        config.algorithm
                    )))
                }
            }
        };

        if config.expiry_seconds <= 0 {
            return Err(DomainError::configuration(
                "JWT expiry_seconds must be positive",
            ));
        }

        let mut builder = Self::builder()
            .algorithm(algorithm)
            .key(key)
            .issuer(config.issuer.clone())
            .lifetime(Duration::from_secs(config.expiry_seconds.unsigned_abs()))
            .token_type(config.token_type.clone())
            .leeway(config.leeway_seconds);

        for (name, value) in &config.header {
            builder = builder.header(name.clone(), value.clone());
        }

        builder.build()
    }

    /// Checks that the configuration can sign and verify
    pub fn validate(&self) -> DomainResult<()> {
        if !self.key.fits(self.algorithm) {
            return Err(DomainError::configuration(format!(
                "Key material does not fit algorithm {:?}",
                self.algorithm
            )));
        }
        if let KeyMaterial::Secret(secret) = &self.key {
            if secret.is_empty() {
                return Err(DomainError::configuration("HMAC secret must not be empty"));
            }
        }
        if self.lifetime.as_secs() == 0 {
            return Err(DomainError::configuration(
                "Token lifetime must be at least one second",
            ));
        }
        if let Some(name) = RESERVED_HEADER_FIELDS
            .iter()
            .find(|name| self.header.contains_key(**name))
        {
            return Err(DomainError::configuration(format!(
                "Header field '{}' cannot be overridden",
                name
            )));
        }

        // Registered header fields (kid, cty, ...) must keep their types or
        // every issued token would fail to decode.
        let mut header = self.header.clone();
        header.insert("alg".to_string(), Value::from(format!("{:?}", self.algorithm)));
        serde_json::from_value::<jsonwebtoken::Header>(Value::Object(header)).map_err(|e| {
            DomainError::configuration(format!("Invalid extra header field: {}", e))
        })?;

        // Parse both halves now so a bad PEM fails at startup, not on the
        // first request.
        self.key.encoding_key(self.algorithm)?;
        self.key.decoding_key(self.algorithm)?;
        Ok(())
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    /// Resolver used at verification time
    ///
    /// Falls back to a [`StaticKeyResolver`] over the configured key.
    pub fn key_resolver(&self) -> DomainResult<Arc<dyn KeyResolver>> {
        match &self.resolver {
            Some(resolver) => Ok(Arc::clone(resolver)),
            None => Ok(Arc::new(StaticKeyResolver::from_material(
                self.algorithm,
                &self.key,
            )?)),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Tolerated clock skew in seconds
    pub fn leeway(&self) -> u64 {
        self.leeway
    }

    /// Extra header fields stamped on every token
    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }
}

impl Default for SigningConfig {
    /// HS256 over the development secret, two hour lifetime, `Bearer` type
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            key: KeyMaterial::secret(DEFAULT_JWT_SECRET),
            resolver: None,
            issuer: String::new(),
            lifetime: DEFAULT_LIFETIME,
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            leeway: 0,
            header: Map::new(),
        }
    }
}

/// Builder for [`SigningConfig`]
#[derive(Default)]
pub struct SigningConfigBuilder {
    config: SigningConfig,
}

impl SigningConfigBuilder {
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    pub fn key(mut self, key: KeyMaterial) -> Self {
        self.config.key = key;
        self
    }

    /// Shorthand for an HMAC secret
    pub fn secret(self, secret: impl AsRef<[u8]>) -> Self {
        self.key(KeyMaterial::secret(secret))
    }

    /// Replace the default single-key resolver
    pub fn key_resolver(mut self, resolver: Arc<dyn KeyResolver>) -> Self {
        self.config.resolver = Some(resolver);
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.config.issuer = issuer.into();
        self
    }

    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.config.lifetime = lifetime;
        self
    }

    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.config.token_type = token_type.into();
        self
    }

    pub fn leeway(mut self, seconds: u64) -> Self {
        self.config.leeway = seconds;
        self
    }

    /// Add one extra header field
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.header.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> DomainResult<SigningConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
