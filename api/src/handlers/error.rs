//! Mapping of domain failures onto HTTP responses

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use tw_core::errors::{MessageCatalog, TokenError};
use tw_shared::{error_codes, ErrorResponse, Language};

use crate::i18n::{self, keys, Catalog};

/// Detect language preference from the Accept-Language header
pub fn extract_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(actix_web::http::header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum ApiErrorKind {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    Internal(String),
}

/// Error returned by handlers and extractors, rendered in the caller's language
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct ApiError {
    kind: ApiErrorKind,
    lang: Language,
}

impl ApiError {
    pub fn token(error: TokenError, lang: Language) -> Self {
        Self {
            kind: ApiErrorKind::Token(error),
            lang,
        }
    }

    pub fn internal(message: impl Into<String>, lang: Language) -> Self {
        Self {
            kind: ApiErrorKind::Internal(message.into()),
            lang,
        }
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::Token(_) => StatusCode::UNAUTHORIZED,
            ApiErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match &self.kind {
            ApiErrorKind::Token(error) => {
                tracing::info!(code = error.code(), "Rejected bearer token");
                ErrorResponse::new(error_codes::UNAUTHORIZED, Catalog::new(self.lang).localize(error))
                    .add_detail("reason", error.reason())
            }
            ApiErrorKind::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                ErrorResponse::new(error_codes::INTERNAL_ERROR, i18n::message(keys::INTERNAL, self.lang))
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
