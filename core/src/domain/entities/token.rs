//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::TokenError;

/// Default type label handed to clients
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Registered claims carried in every token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the principal the token speaks for)
    pub sub: String,

    /// Issuer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub iss: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid from `now` for `lifetime_secs` seconds
    ///
    /// All three timestamps derive from the same `now`, which is what keeps
    /// `iat <= nbf <= exp` without a separate check.
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        now: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            sub: subject.into(),
            iss: issuer.into(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(lifetime_secs),
        }
    }

    /// Checks the validity window `[nbf, exp)` at `now`
    ///
    /// `leeway` widens the window on both sides.
    pub fn check_time(&self, now: i64, leeway: i64) -> Result<(), TokenError> {
        if now < self.nbf.saturating_sub(leeway) {
            return Err(TokenError::NotYetValid);
        }
        if now >= self.exp.saturating_add(leeway) {
            return Err(TokenError::Expired);
        }
        Ok(())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Time left until natural expiry, zero once expired
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Duration {
        self.usable_lifetime(now, 0)
    }

    /// Time left until [`Claims::check_time`] stops accepting the token,
    /// zero once it does
    pub fn usable_lifetime(&self, now: DateTime<Utc>, leeway: i64) -> Duration {
        DateTime::from_timestamp(self.exp.saturating_add(leeway), 0)
            .and_then(|until| (until - now).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }
}

/// Token returned to the caller after signing
///
/// Serialized for clients as `{"token": .., "type": .., "expireAt": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    token: String,
    #[serde(rename = "type")]
    token_type: String,
    #[serde(rename = "expireAt")]
    expires_at: i64,
}

impl IssuedToken {
    pub fn new(token: String, token_type: impl Into<String>, expires_at: i64) -> Self {
        Self {
            token,
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// The signed token string
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Expiry as Unix seconds
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// `"<type> <token>"`, ready for an Authorization header
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn into_token(self) -> String {
        self.token
    }
}

/// State of a token as observed by one verification
///
/// Nothing stores this; every verification recomputes it from the claims,
/// the clock and the revocation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    Valid,
    Expired,
    NotYetValid,
    Revoked,
}

impl TokenState {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenState::Valid)
    }
}
