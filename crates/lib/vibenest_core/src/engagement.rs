//! Engagement: likes, comments and bookmarks on stories.
//!
//! Likes and bookmarks share one pattern: a unique (user, story) pair, a
//! friendly pre-check, and the constraint as the real guard.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::{is_foreign_key_violation, is_unique_violation, violates_foreign_key};
use crate::models::social::{Bookmark, Comment, CommentWithAuthor, Like, LikeSummary};
use crate::models::story::StoryWithAuthor;
use crate::models::user::CommentAuthor;
use crate::stories::{STORY_WITH_AUTHOR_SELECT, StoryAuthorRow};
use crate::uuid::uuidv7;
use crate::validation::{ValidationErrors, validate_comment};

/// Engagement errors.
#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("Story already liked")]
    AlreadyLiked,

    #[error("Story already bookmarked")]
    AlreadyBookmarked,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Story not found")]
    StoryNotFound,

    /// The requester has no `users` row yet (identity never synced).
    #[error("Unknown user")]
    UnknownUser,

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

// Foreign keys naming the requester; any other FK on these tables is the story.
const LIKES_USER_FK: &str = "likes_user_id_fkey";
const COMMENTS_AUTHOR_FK: &str = "comments_author_id_fkey";
const BOOKMARKS_USER_FK: &str = "bookmarks_user_id_fkey";

/// Map an insert failure: duplicate pair → `duplicate`, unsynced requester →
/// `UnknownUser`, dangling story → `StoryNotFound`.
fn insert_error(e: sqlx::Error, duplicate: EngagementError, user_fk: &str) -> EngagementError {
    if is_unique_violation(&e) {
        duplicate
    } else if violates_foreign_key(&e, user_fk) {
        EngagementError::UnknownUser
    } else if is_foreign_key_violation(&e) {
        EngagementError::StoryNotFound
    } else {
        EngagementError::DbError(e)
    }
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

pub async fn like(pool: &PgPool, user_id: &str, story_id: Uuid) -> Result<Like, EngagementError> {
    if is_liked(pool, story_id, user_id).await? {
        return Err(EngagementError::AlreadyLiked);
    }
    let like = sqlx::query_as::<_, Like>(
        "INSERT INTO likes (user_id, story_id) VALUES ($1, $2) \
         RETURNING user_id, story_id, created_at",
    )
    .bind(user_id)
    .bind(story_id)
    .fetch_one(pool)
    .await
    .map_err(|e| insert_error(e, EngagementError::AlreadyLiked, LIKES_USER_FK))?;
    info!(user_id, %story_id, "story liked");
    Ok(like)
}

/// Remove a like if present.
pub async fn unlike(pool: &PgPool, user_id: &str, story_id: Uuid) -> Result<(), EngagementError> {
    sqlx::query("DELETE FROM likes WHERE user_id = $1 AND story_id = $2")
        .bind(user_id)
        .bind(story_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn like_count(pool: &PgPool, story_id: Uuid) -> Result<i64, EngagementError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE story_id = $1")
        .bind(story_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn is_liked(pool: &PgPool, story_id: Uuid, user_id: &str) -> Result<bool, EngagementError> {
    let liked = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE story_id = $1 AND user_id = $2)",
    )
    .bind(story_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(liked)
}

/// Like count plus whether `viewer_id` liked the story.
pub async fn like_summary(
    pool: &PgPool,
    story_id: Uuid,
    viewer_id: &str,
) -> Result<LikeSummary, EngagementError> {
    Ok(LikeSummary {
        count: like_count(pool, story_id).await?,
        is_liked: is_liked(pool, story_id, viewer_id).await?,
    })
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, sqlx::FromRow)]
struct CommentAuthorRow {
    #[sqlx(flatten)]
    comment: Comment,
    author_first_name: Option<String>,
    author_last_name: Option<String>,
    author_profile_image_url: Option<String>,
}

impl From<CommentAuthorRow> for CommentWithAuthor {
    fn from(row: CommentAuthorRow) -> Self {
        let author = CommentAuthor {
            id: row.comment.author_id.clone(),
            first_name: row.author_first_name,
            last_name: row.author_last_name,
            profile_image_url: row.author_profile_image_url,
        };
        CommentWithAuthor {
            comment: row.comment,
            author,
        }
    }
}

/// Validate and add a comment, returning it with the commenter's identity.
pub async fn add_comment(
    pool: &PgPool,
    user_id: &str,
    story_id: Uuid,
    content: &str,
) -> Result<CommentWithAuthor, EngagementError> {
    let content = validate_comment(content)?;
    let row = sqlx::query_as::<_, CommentAuthorRow>(
        "WITH inserted AS ( \
             INSERT INTO comments (id, author_id, story_id, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, author_id, story_id, content, created_at \
         ) \
         SELECT c.id, c.author_id, c.story_id, c.content, c.created_at, \
                u.first_name AS author_first_name, u.last_name AS author_last_name, \
                u.profile_image_url AS author_profile_image_url \
         FROM inserted c \
         INNER JOIN users u ON u.id = c.author_id",
    )
    .bind(uuidv7())
    .bind(user_id)
    .bind(story_id)
    .bind(&content)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if violates_foreign_key(&e, COMMENTS_AUTHOR_FK) {
            EngagementError::UnknownUser
        } else if is_foreign_key_violation(&e) {
            EngagementError::StoryNotFound
        } else {
            EngagementError::DbError(e)
        }
    })?;
    info!(user_id, %story_id, comment_id = %row.comment.id, "comment added");
    Ok(row.into())
}

/// All comments on a story, newest first.
pub async fn list_comments(
    pool: &PgPool,
    story_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, EngagementError> {
    let rows = sqlx::query_as::<_, CommentAuthorRow>(
        "SELECT c.id, c.author_id, c.story_id, c.content, c.created_at, \
                u.first_name AS author_first_name, u.last_name AS author_last_name, \
                u.profile_image_url AS author_profile_image_url \
         FROM comments c \
         INNER JOIN users u ON u.id = c.author_id \
         WHERE c.story_id = $1 \
         ORDER BY c.created_at DESC, c.id DESC",
    )
    .bind(story_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

pub async fn bookmark(
    pool: &PgPool,
    user_id: &str,
    story_id: Uuid,
) -> Result<Bookmark, EngagementError> {
    if is_bookmarked(pool, user_id, story_id).await? {
        return Err(EngagementError::AlreadyBookmarked);
    }
    let bookmark = sqlx::query_as::<_, Bookmark>(
        "INSERT INTO bookmarks (user_id, story_id) VALUES ($1, $2) \
         RETURNING user_id, story_id, created_at",
    )
    .bind(user_id)
    .bind(story_id)
    .fetch_one(pool)
    .await
    .map_err(|e| insert_error(e, EngagementError::AlreadyBookmarked, BOOKMARKS_USER_FK))?;
    info!(user_id, %story_id, "story bookmarked");
    Ok(bookmark)
}

/// Remove a bookmark if present.
pub async fn unbookmark(
    pool: &PgPool,
    user_id: &str,
    story_id: Uuid,
) -> Result<(), EngagementError> {
    sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND story_id = $2")
        .bind(user_id)
        .bind(story_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn is_bookmarked(
    pool: &PgPool,
    user_id: &str,
    story_id: Uuid,
) -> Result<bool, EngagementError> {
    let saved = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = $1 AND story_id = $2)",
    )
    .bind(user_id)
    .bind(story_id)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}

/// Stories `user_id` bookmarked, most recently saved first.
pub async fn list_bookmarked_stories(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<StoryWithAuthor>, EngagementError> {
    let rows = sqlx::query_as::<_, StoryAuthorRow>(&format!(
        "{STORY_WITH_AUTHOR_SELECT} \
         INNER JOIN bookmarks b ON b.story_id = s.id \
         WHERE b.user_id = $1 \
         ORDER BY b.created_at DESC, s.id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
