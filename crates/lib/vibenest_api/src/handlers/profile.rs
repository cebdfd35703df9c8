//! Profile request handlers.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use vibenest_core::models::user::User;
use vibenest_core::users;

use crate::AppState;
use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
}

/// `PATCH /api/profile`: replace the caller's bio. Empty or null clears it.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    AppJson(body): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    let updated = users::update_bio(&state.pool, user.id(), body.bio).await?;
    Ok(Json(updated))
}
