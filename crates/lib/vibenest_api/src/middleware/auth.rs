//! Authentication middleware: session token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use vibenest_core::auth::jwt::verify_access_token;
use vibenest_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::SESSION_COOKIE;

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

impl AuthenticatedUser {
    /// The caller's user id.
    pub fn id(&self) -> &str {
        &self.0.sub
    }
}

/// Axum middleware: takes the session token from `Authorization: Bearer` or,
/// failing that, the session cookie, verifies it, and injects
/// `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&request)?;

    let claims = verify_access_token(&token, state.config.jwt_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

fn session_token(request: &Request) -> Result<String, AppError> {
    if let Some(header) = request.headers().get(AUTHORIZATION) {
        let header = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;
        return Ok(token.trim().to_string());
    }

    CookieJar::from_headers(request.headers())
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
}
