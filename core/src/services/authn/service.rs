//! Main authenticator implementation

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, EncodingKey, Validation};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::context::RequestContext;
use crate::domain::entities::token::{Claims, IssuedToken, TokenState};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::config::SigningConfig;
use super::keys::KeyResolver;
use super::Authenticator;

/// JWT authenticator with optional revocation
///
/// Without a store the authenticator is purely stateless: `destroy` succeeds
/// without effect and a token stays valid until it expires.
///
/// # Concurrency
/// The authenticator is immutable after construction and is shared behind an
/// `Arc`. A `parse_claims` that has already passed its revocation lookup
/// still returns the claims if the same token is destroyed concurrently; the
/// next verification observes the revocation.
pub struct JwtAuthenticator {
    config: SigningConfig,
    encoding_key: EncodingKey,
    resolver: Arc<dyn KeyResolver>,
    validation: Validation,
    /// Encoded header segment, identical for every token
    header_segment: String,
    store: Option<Arc<dyn RevocationStore>>,
    clock: Arc<dyn Clock>,
    released: AtomicBool,
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("config", &self.config)
            .field("has_store", &self.store.is_some())
            .field("clock", &self.clock)
            .field("released", &self.released.load(Ordering::Relaxed))
            .finish()
    }
}

impl JwtAuthenticator {
    /// Creates a new authenticator
    ///
    /// # Arguments
    ///
    /// * `config` - Validated signing configuration
    /// * `store` - Revocation store, or `None` for stateless mode
    pub fn new(
        config: SigningConfig,
        store: Option<Arc<dyn RevocationStore>>,
    ) -> DomainResult<Self> {
        let algorithm = config.algorithm();
        let encoding_key = config.key().encoding_key(algorithm)?;
        let resolver = config.key_resolver()?;
        let header_segment = encode_header(&config)?;

        // Time and issuer are checked against the injected clock after
        // decoding, so jsonwebtoken only verifies the signature.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        if store.is_none() {
            tracing::info!("Token revocation disabled; destroy will not revoke tokens");
        }

        Ok(Self {
            config,
            encoding_key,
            resolver,
            validation,
            header_segment,
            store,
            clock: Arc::new(SystemClock),
            released: AtomicBool::new(false),
        })
    }

    /// Creates an authenticator without revocation store
    pub fn stateless(config: SigningConfig) -> DomainResult<Self> {
        Self::new(config, None)
    }

    /// Read time from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Whether revocation is backed by a store
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Reports the state of `token` at this instant
    ///
    /// Expired, not-yet-valid and revoked tokens are states, not errors.
    /// Every other failure (bad structure, wrong algorithm, store outage)
    /// is returned as the error it is.
    pub async fn inspect(&self, ctx: &RequestContext, token: &str) -> Result<TokenState, TokenError> {
        match self.parse_claims(ctx, token).await {
            Ok(_) => Ok(TokenState::Valid),
            Err(TokenError::Expired) => Ok(TokenState::Expired),
            Err(TokenError::NotYetValid) => Ok(TokenState::NotYetValid),
            Err(TokenError::Revoked) => Ok(TokenState::Revoked),
            Err(e) => Err(e),
        }
    }

    /// Structure, algorithm, signature, issuer and time checks
    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let header_segment = match token.split('.').collect::<Vec<_>>().as_slice() {
            [header, _, _] if !header.is_empty() => *header,
            _ => return Err(TokenError::Malformed),
        };

        let header = decode_header(token).map_err(|_| classify_header(header_segment))?;
        if header.alg != self.config.algorithm() {
            return Err(TokenError::AlgorithmMismatch);
        }
        let key = self.resolver.resolve(&header)?;

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::AlgorithmMismatch
                }
                _ => TokenError::VerificationFailed,
            })?
            .claims;

        if !self.config.issuer().is_empty() && claims.iss != self.config.issuer() {
            return Err(TokenError::VerificationFailed);
        }

        let leeway = i64::try_from(self.config.leeway()).unwrap_or(i64::MAX);
        claims.check_time(self.clock.now().timestamp(), leeway)?;
        Ok(claims)
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn sign(&self, _ctx: &RequestContext, subject: &str) -> Result<IssuedToken, TokenError> {
        if subject.is_empty() {
            tracing::warn!("Refusing to sign a token without subject");
            return Err(TokenError::SigningFailed);
        }

        let lifetime = i64::try_from(self.config.lifetime().as_secs()).unwrap_or(i64::MAX);
        let claims = Claims::new(
            subject,
            self.config.issuer(),
            self.clock.now().timestamp(),
            lifetime,
        );

        let payload = serde_json::to_vec(&claims).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode token claims");
            TokenError::SigningFailed
        })?;
        let message = format!("{}.{}", self.header_segment, URL_SAFE_NO_PAD.encode(payload));
        let signature =
            jsonwebtoken::crypto::sign(message.as_bytes(), &self.encoding_key, self.config.algorithm())
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to sign token");
                    TokenError::SigningFailed
                })?;

        tracing::debug!(subject = %claims.sub, expires_at = claims.exp, "Token issued");
        Ok(IssuedToken::new(
            format!("{}.{}", message, signature),
            self.config.token_type(),
            claims.exp,
        ))
    }

    async fn parse_claims(&self, ctx: &RequestContext, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }

        let claims = self.verify(token).map_err(|e| {
            tracing::debug!(code = e.code(), "Token rejected");
            e
        })?;

        if let Some(store) = &self.store {
            match store.check(ctx, token).await {
                Ok(true) => {
                    tracing::debug!(subject = %claims.sub, "Revoked token presented");
                    return Err(TokenError::Revoked);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(subject = %claims.sub, error = %e, "Revocation lookup failed; rejecting token");
                    return Err(TokenError::StoreFailure(e));
                }
            }
        }

        Ok(claims)
    }

    async fn destroy(&self, ctx: &RequestContext, token: &str) -> Result<(), TokenError> {
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }
        let claims = self.verify(token)?;

        let Some(store) = &self.store else {
            return Ok(());
        };

        // The record must outlive every instant verify still accepts the token
        let leeway = i64::try_from(self.config.leeway()).unwrap_or(i64::MAX);
        let ttl = claims.usable_lifetime(self.clock.now(), leeway);
        if ttl.is_zero() {
            tracing::debug!(subject = %claims.sub, "Token stops verifying before revocation would matter; skipping store write");
            return Ok(());
        }

        store.set(ctx, token, ttl).await.map_err(|e| {
            tracing::warn!(subject = %claims.sub, error = %e, "Failed to record token revocation");
            TokenError::StoreFailure(e)
        })?;

        tracing::info!(subject = %claims.sub, ttl_secs = ttl.as_secs(), "Token revoked");
        Ok(())
    }

    async fn release(&self) -> Result<(), TokenError> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        if let Some(store) = &self.store {
            store.close().await.map_err(|e| {
                tracing::warn!(error = %e, "Failed to release revocation store");
                TokenError::StoreFailure(e)
            })?;
            tracing::info!("Revocation store released");
        }
        Ok(())
    }
}

/// Builds the header segment: `alg`, `typ` and any extra fields
fn encode_header(config: &SigningConfig) -> DomainResult<String> {
    let mut header = Map::new();
    for (name, value) in config.header() {
        header.insert(name.clone(), value.clone());
    }
    let alg = serde_json::to_value(config.algorithm())
        .map_err(|e| DomainError::configuration(format!("Cannot encode algorithm: {}", e)))?;
    header.insert("alg".to_string(), alg);
    header.insert("typ".to_string(), Value::from("JWT"));

    let json = serde_json::to_vec(&Value::Object(header))
        .map_err(|e| DomainError::configuration(format!("Cannot encode token header: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Error for a header jsonwebtoken could not parse
///
/// A readable header naming an algorithm jsonwebtoken does not know, such
/// as `none`, is an algorithm mismatch rather than garbage.
fn classify_header(segment: &str) -> TokenError {
    let declares_alg = URL_SAFE_NO_PAD
        .decode(segment)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .is_some_and(|header| header.get("alg").is_some_and(Value::is_string));

    if declares_alg {
        TokenError::AlgorithmMismatch
    } else {
        TokenError::Malformed
    }
}
