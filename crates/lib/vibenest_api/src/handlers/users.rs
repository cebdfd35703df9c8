//! Follow request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use vibenest_core::models::social::{Follow, FollowStatus};
use vibenest_core::social;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;

/// `POST /api/users/{id}/follow`
pub async fn follow_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Follow>)> {
    let edge = social::follow(&state.pool, user.id(), &id).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// `DELETE /api/users/{id}/follow`
pub async fn unfollow_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    social::unfollow(&state.pool, user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/users/{id}/follow-status`: the caller's relation plus counts.
pub async fn follow_status_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<FollowStatus>> {
    Ok(Json(social::follow_status(&state.pool, user.id(), &id).await?))
}
