//! Social graph: directed follow edges between users.

use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::db::{is_foreign_key_violation, is_unique_violation, violates_foreign_key};
use crate::models::social::{Follow, FollowStatus};

/// Social graph errors.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("You cannot follow yourself")]
    SelfFollowForbidden,

    #[error("Already following this user")]
    AlreadyFollowing,

    #[error("User not found")]
    UserNotFound,

    /// The follower has no `users` row yet (identity never synced).
    #[error("Unknown follower")]
    UnknownFollower,

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

const FOLLOWER_FK: &str = "follows_follower_id_fkey";

/// Add the edge `follower_id → following_id`.
///
/// The existence pre-check only produces the friendlier error; the unique
/// constraint is what actually keeps edges from duplicating under races.
pub async fn follow(
    pool: &PgPool,
    follower_id: &str,
    following_id: &str,
) -> Result<Follow, SocialError> {
    if follower_id == following_id {
        return Err(SocialError::SelfFollowForbidden);
    }
    if is_following(pool, follower_id, following_id).await? {
        return Err(SocialError::AlreadyFollowing);
    }

    let edge = sqlx::query_as::<_, Follow>(
        "INSERT INTO follows (follower_id, following_id) VALUES ($1, $2) \
         RETURNING follower_id, following_id, created_at",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        e if is_unique_violation(&e) => SocialError::AlreadyFollowing,
        e if violates_foreign_key(&e, FOLLOWER_FK) => SocialError::UnknownFollower,
        e if is_foreign_key_violation(&e) => SocialError::UserNotFound,
        e => SocialError::DbError(e),
    })?;

    info!(follower_id, following_id, "follow edge added");
    Ok(edge)
}

/// Remove the edge if present. Absent edges are not an error.
pub async fn unfollow(
    pool: &PgPool,
    follower_id: &str,
    following_id: &str,
) -> Result<(), SocialError> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        info!(follower_id, following_id, "follow edge removed");
    }
    Ok(())
}

pub async fn is_following(
    pool: &PgPool,
    follower_id: &str,
    following_id: &str,
) -> Result<bool, SocialError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Number of users following `user_id`.
pub async fn follower_count(pool: &PgPool, user_id: &str) -> Result<i64, SocialError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Number of users `user_id` follows.
pub async fn following_count(pool: &PgPool, user_id: &str) -> Result<i64, SocialError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Ids of every user `user_id` follows.
pub async fn following_ids(pool: &PgPool, user_id: &str) -> Result<HashSet<String>, SocialError> {
    let ids = sqlx::query_scalar::<_, String>("SELECT following_id FROM follows WHERE follower_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

/// `viewer_id`'s relation to `user_id` plus `user_id`'s counts.
pub async fn follow_status(
    pool: &PgPool,
    viewer_id: &str,
    user_id: &str,
) -> Result<FollowStatus, SocialError> {
    Ok(FollowStatus {
        is_following: is_following(pool, viewer_id, user_id).await?,
        follower_count: follower_count(pool, user_id).await?,
        following_count: following_count(pool, user_id).await?,
    })
}
