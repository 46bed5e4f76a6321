use actix_web::HttpResponse;

use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me
///
/// Returns the verified claims of the bearer token.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(&auth.claims)
}
