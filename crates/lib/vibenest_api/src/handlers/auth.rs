//! Session and identity request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use vibenest_core::models::user::User;
use vibenest_core::users;

use crate::AppState;
use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::auth::{self, ExchangeResponse, HandoffResponse};
use crate::services::cookies::{clear_session_cookie, session_cookie};

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default)]
    pub token: String,
}

/// `GET /api/auth/user`: sync the caller's identity claims and return the user.
pub async fn current_user_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<User>> {
    let user = users::upsert_user(&state.pool, &user.0.identity()).await?;
    Ok(Json(user))
}

/// `POST /api/auth/logout`: clear the session cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    (
        jar.add(clear_session_cookie(state.config.secure_cookies)),
        StatusCode::NO_CONTENT,
    )
}

/// `POST /api/auth/mobile-handoff`: park a fresh session behind a single-use
/// token for the mobile app.
pub async fn mobile_handoff_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<HandoffResponse>> {
    let resp = auth::create_mobile_handoff(&state.pool, &state.config, &user.0).await?;
    Ok(Json(resp))
}

/// `POST /api/auth/mobile-exchange`: redeem a handoff token for a session.
pub async fn mobile_exchange_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<ExchangeRequest>,
) -> AppResult<(CookieJar, Json<ExchangeResponse>)> {
    let resp = auth::exchange_mobile_handoff(&state.pool, &state.config, &body.token).await?;
    let cookie = session_cookie(
        &resp.access_token,
        resp.expires_in,
        state.config.secure_cookies,
    );
    Ok((jar.add(cookie), Json(resp)))
}
