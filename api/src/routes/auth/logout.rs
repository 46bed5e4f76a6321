use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use tw_core::context::RequestContext;

use crate::handlers::error::{extract_language, ApiError};
use crate::i18n::{self, keys};
use crate::middleware::auth::AuthContext;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the bearer token until it would have expired anyway.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing, invalid or already revoked token, or the
///   revocation could not be recorded
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    let lang = extract_language(&req);
    let ctx = RequestContext::with_timeout(state.store_timeout);

    state
        .authenticator
        .destroy(&ctx, &auth.token)
        .await
        .map_err(|e| ApiError::token(e, lang))?;

    tracing::info!(sub = %auth.subject(), "Logged out");

    Ok(HttpResponse::Ok().json(LogoutResponse {
        message: i18n::message(keys::LOGOUT_SUCCESS, lang),
    }))
}
