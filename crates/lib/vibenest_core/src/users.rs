//! User persistence.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::models::user::{User, UserIdentity};
use crate::validation::{ValidationErrors, validate_bio};

/// User operation errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, profile_image_url, bio, created_at, updated_at";

/// Fetch a user by id.
pub async fn get_user(pool: &PgPool, user_id: &str) -> Result<Option<User>, UserError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert or refresh a user from identity-provider claims. The bio is left
/// untouched on conflict.
pub async fn upsert_user(pool: &PgPool, identity: &UserIdentity) -> Result<User, UserError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, email, first_name, last_name, profile_image_url) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (id) DO UPDATE SET \
             email = EXCLUDED.email, \
             first_name = EXCLUDED.first_name, \
             last_name = EXCLUDED.last_name, \
             profile_image_url = EXCLUDED.profile_image_url, \
             updated_at = now() \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&identity.id)
    .bind(&identity.email)
    .bind(&identity.first_name)
    .bind(&identity.last_name)
    .bind(&identity.profile_image_url)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Replace the caller's bio. `None` or an empty string clears it.
pub async fn update_bio(
    pool: &PgPool,
    user_id: &str,
    bio: Option<String>,
) -> Result<User, UserError> {
    let bio = validate_bio(bio)?;
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET bio = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&bio)
    .fetch_optional(pool)
    .await?
    .ok_or(UserError::NotFound)?;
    info!(user_id, cleared = bio.is_none(), "bio updated");
    Ok(user)
}
