//! Story persistence and ownership-scoped mutation.
//!
//! Update and delete carry the author id in the statement's predicate, so the
//! ownership check and the write are one atomic statement. A miss cannot tell
//! "no such story" apart from "someone else's story", and neither can the
//! caller.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::is_foreign_key_violation;
use crate::models::story::{Story, StoryDraft, StoryWithAuthor};
use crate::models::user::Author;
use crate::uuid::uuidv7;
use crate::validation::{ValidationErrors, validate_story};

/// Story operation errors.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Story not found")]
    NotFound,

    #[error("Story not found or unauthorized")]
    NotFoundOrUnauthorized,

    /// The requester has no `users` row yet (identity never synced).
    #[error("Unknown author")]
    UnknownAuthor,

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

pub(crate) const STORY_COLUMNS: &str =
    "id, author_id, title, caption, content, category, music_url, created_at, updated_at";

/// Select list + join for story rows carrying their author. Callers append
/// `WHERE`/`ORDER BY` clauses; the story table is aliased `s`, users `u`.
pub(crate) const STORY_WITH_AUTHOR_SELECT: &str = "SELECT s.id, s.author_id, s.title, s.caption, \
     s.content, s.category, s.music_url, s.created_at, s.updated_at, \
     u.first_name AS author_first_name, u.last_name AS author_last_name, \
     u.profile_image_url AS author_profile_image_url, u.bio AS author_bio \
     FROM stories s \
     INNER JOIN users u ON u.id = s.author_id";

/// Feed ordering: newest first, UUIDv7 id breaks timestamp ties.
pub(crate) const NEWEST_FIRST: &str = "ORDER BY s.created_at DESC, s.id DESC";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StoryAuthorRow {
    #[sqlx(flatten)]
    story: Story,
    author_first_name: Option<String>,
    author_last_name: Option<String>,
    author_profile_image_url: Option<String>,
    author_bio: Option<String>,
}

impl From<StoryAuthorRow> for StoryWithAuthor {
    fn from(row: StoryAuthorRow) -> Self {
        let author = Author {
            id: row.story.author_id.clone(),
            first_name: row.author_first_name,
            last_name: row.author_last_name,
            profile_image_url: row.author_profile_image_url,
            bio: row.author_bio,
        };
        StoryWithAuthor {
            story: row.story,
            author,
        }
    }
}

/// Validate and persist a new story owned by `author_id`.
pub async fn create_story(
    pool: &PgPool,
    author_id: &str,
    draft: StoryDraft,
) -> Result<Story, StoryError> {
    let new = validate_story(draft)?;
    let story = sqlx::query_as::<_, Story>(&format!(
        "INSERT INTO stories (id, author_id, title, caption, content, category, music_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {STORY_COLUMNS}"
    ))
    .bind(uuidv7())
    .bind(author_id)
    .bind(&new.title)
    .bind(&new.caption)
    .bind(&new.content)
    .bind(new.category.as_str())
    .bind(&new.music_url)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            StoryError::UnknownAuthor
        } else {
            StoryError::DbError(e)
        }
    })?;
    info!(story_id = %story.id, author_id, category = %story.category, "story created");
    Ok(story)
}

/// Stories written by `author_id`, newest first.
pub async fn list_user_stories(pool: &PgPool, author_id: &str) -> Result<Vec<Story>, StoryError> {
    let stories = sqlx::query_as::<_, Story>(&format!(
        "SELECT {STORY_COLUMNS} FROM stories WHERE author_id = $1 \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await?;
    Ok(stories)
}

/// Fetch one story with its author.
pub async fn get_story(pool: &PgPool, story_id: Uuid) -> Result<StoryWithAuthor, StoryError> {
    let row = sqlx::query_as::<_, StoryAuthorRow>(&format!(
        "{STORY_WITH_AUTHOR_SELECT} WHERE s.id = $1"
    ))
    .bind(story_id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoryError::NotFound)?;
    Ok(row.into())
}

/// Replace every editable field of a story the requester owns.
pub async fn update_story(
    pool: &PgPool,
    story_id: Uuid,
    author_id: &str,
    draft: StoryDraft,
) -> Result<Story, StoryError> {
    let new = validate_story(draft)?;
    let story = sqlx::query_as::<_, Story>(&format!(
        "UPDATE stories SET \
             title = $3, caption = $4, content = $5, category = $6, music_url = $7, \
             updated_at = now() \
         WHERE id = $1 AND author_id = $2 \
         RETURNING {STORY_COLUMNS}"
    ))
    .bind(story_id)
    .bind(author_id)
    .bind(&new.title)
    .bind(&new.caption)
    .bind(&new.content)
    .bind(new.category.as_str())
    .bind(&new.music_url)
    .fetch_optional(pool)
    .await?
    .ok_or(StoryError::NotFoundOrUnauthorized)?;
    info!(story_id = %story.id, author_id, "story updated");
    Ok(story)
}

/// Delete a story the requester owns. Likes, comments and bookmarks cascade.
pub async fn delete_story(pool: &PgPool, story_id: Uuid, author_id: &str) -> Result<(), StoryError> {
    let result = sqlx::query("DELETE FROM stories WHERE id = $1 AND author_id = $2")
        .bind(story_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoryError::NotFoundOrUnauthorized);
    }
    info!(%story_id, author_id, "story deleted");
    Ok(())
}
