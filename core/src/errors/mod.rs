//! Domain-specific error types and error handling.

mod messages;
mod types;


pub use messages::{default_message, DefaultMessages, MessageCatalog};
pub use types::{StoreError, TokenError, UNAUTHORIZED_REASON};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Startup validation of signing or store settings failed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        DomainError::Configuration {
            message: message.into(),
        }
    }

    /// The token failure, if this error is one
    pub fn as_token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(error) => Some(error),
            DomainError::Configuration { .. } => None,
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(error: StoreError) -> Self {
        DomainError::Token(TokenError::StoreFailure(error))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
