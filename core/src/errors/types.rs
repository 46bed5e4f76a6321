//! Token and revocation store error types
//!
//! Every variant of [`TokenError`] belongs to the "unauthorized" class. The
//! variants stay distinct inside the process so callers and logs can tell
//! them apart; transports answer all of them with the same status and
//! reason, varying only the localized message.

use thiserror::Error;

/// Reason shared by every token failure
pub const UNAUTHORIZED_REASON: &str = "Unauthorized";

/// Failures raised while issuing, verifying or revoking tokens
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token is expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,

    #[error("Wrong signing method")]
    AlgorithmMismatch,

    #[error("Fail to verify token")]
    VerificationFailed,

    #[error("Token is revoked")]
    Revoked,

    #[error("Failed to sign token")]
    SigningFailed,

    #[error("Revocation store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl TokenError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Malformed => "TOKEN_MALFORMED",
            TokenError::Expired => "TOKEN_EXPIRED",
            TokenError::NotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::AlgorithmMismatch => "TOKEN_ALGORITHM_MISMATCH",
            TokenError::VerificationFailed => "TOKEN_VERIFICATION_FAILED",
            TokenError::Revoked => "TOKEN_REVOKED",
            TokenError::SigningFailed => "TOKEN_SIGNING_FAILED",
            TokenError::StoreFailure(_) => "TOKEN_STORE_FAILURE",
        }
    }

    /// Lookup key handed to the localization collaborator
    pub fn message_key(&self) -> &'static str {
        match self {
            TokenError::Malformed => "jwt.token.invalid",
            TokenError::Expired => "jwt.token.expired",
            TokenError::NotYetValid => "jwt.token.not.valid.yet",
            TokenError::AlgorithmMismatch => "jwt.token.signing.method",
            TokenError::VerificationFailed => "jwt.token.parse.failed",
            TokenError::Revoked => "jwt.token.revoked",
            TokenError::SigningFailed => "jwt.token.sign.failed",
            TokenError::StoreFailure(_) => "jwt.token.store.failed",
        }
    }

    /// Reason class; identical for every variant
    pub fn reason(&self) -> &'static str {
        UNAUTHORIZED_REASON
    }

    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, TokenError::StoreFailure(_))
    }
}

/// Errors surfaced by a revocation store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend reported an error; the original error is kept as source
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The caller's deadline passed before the backend answered
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The store was released and can no longer be used
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Wrap any backend error
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(error))
    }
}
