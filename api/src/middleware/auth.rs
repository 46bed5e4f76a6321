//! Bearer token authentication for protected endpoints.
//!
//! [`AuthContext`] is an extractor: a handler that takes it only runs once
//! the Authorization header carries a token that verifies and is not
//! revoked.

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tw_core::context::RequestContext;
use tw_core::domain::entities::token::Claims;
use tw_core::errors::TokenError;

use crate::handlers::error::{extract_language, ApiError};
use crate::routes::auth::AppState;

/// Authentication context of a verified request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Verified claims of the presented token
    pub claims: Claims,
    /// The raw token, needed to revoke it
    pub token: String,
}

impl AuthContext {
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}

impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let lang = extract_language(req);
        // A missing or non-bearer header verifies like an empty token
        let token = extract_bearer_token(req).unwrap_or_default().to_string();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or_else(|| ApiError::internal("Authenticator not configured", lang))?;
            let ctx = RequestContext::with_timeout(state.store_timeout);

            let claims = state
                .authenticator
                .parse_claims(&ctx, &token)
                .await
                .map_err(|e: TokenError| ApiError::token(e, lang))?;

            Ok(AuthContext { claims, token })
        })
    }
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
}
