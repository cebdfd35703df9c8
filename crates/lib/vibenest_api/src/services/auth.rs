//! Session service: the mobile handoff flows, delegating storage to
//! `vibenest_core::auth`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use vibenest_core::auth::handoff::{self, HandoffCredentials};
use vibenest_core::auth::jwt::{generate_access_token, verify_access_token};
use vibenest_core::models::auth::TokenClaims;
use vibenest_core::models::user::User;
use vibenest_core::users;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// `POST /api/auth/mobile-handoff` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffResponse {
    pub token: String,
    pub redirect_url: String,
}

/// `POST /api/auth/mobile-exchange` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: User,
}

/// Mint a fresh session for the caller and park it behind a single-use
/// handoff token the mobile app can redeem.
pub async fn create_mobile_handoff(
    pool: &PgPool,
    config: &ApiConfig,
    claims: &TokenClaims,
) -> AppResult<HandoffResponse> {
    let identity = claims.identity();
    users::upsert_user(pool, &identity).await?;

    let access_token = generate_access_token(
        &identity,
        config.session_ttl_secs,
        config.jwt_secret.as_bytes(),
    )?;
    let credentials = HandoffCredentials {
        access_token,
        refresh_token: None,
    };
    let (token, _expires_at) =
        handoff::create_handoff(pool, &identity, &credentials, config.handoff_ttl_secs).await?;

    let redirect_url = format!("{}?token={token}", config.mobile_redirect_base);
    Ok(HandoffResponse {
        token,
        redirect_url,
    })
}

/// Redeem a handoff token for the session it carries.
pub async fn exchange_mobile_handoff(
    pool: &PgPool,
    config: &ApiConfig,
    token: &str,
) -> AppResult<ExchangeResponse> {
    let grant = handoff::consume_handoff(pool, token).await?;

    // The stored session may have been signed with a since-rotated secret or
    // outlived its own expiry while parked.
    let claims = verify_access_token(&grant.access_token, config.jwt_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user = users::upsert_user(pool, &grant.identity).await?;
    info!(user_id = %user.id, "mobile handoff exchanged");

    Ok(ExchangeResponse {
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
        token_type: "Bearer".into(),
        expires_in: (claims.exp - Utc::now().timestamp()).max(0),
        user,
    })
}
