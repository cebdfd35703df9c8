//! Like, comment and bookmark request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use vibenest_core::engagement;
use vibenest_core::models::social::{Bookmark, CommentWithAuthor, Like, LikeSummary};
use vibenest_core::models::story::StoryWithAuthor;

use super::story_id;
use crate::AppState;
use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatus {
    pub is_bookmarked: bool,
}

/// `POST /api/stories/{id}/like`
pub async fn like_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Like>)> {
    let id = story_id(&id)?;
    let like = engagement::like(&state.pool, user.id(), id).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

/// `DELETE /api/stories/{id}/like`
pub async fn unlike_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = story_id(&id)?;
    engagement::unlike(&state.pool, user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/stories/{id}/likes`: count plus whether the caller liked it.
pub async fn likes_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<LikeSummary>> {
    let id = story_id(&id)?;
    Ok(Json(engagement::like_summary(&state.pool, id, user.id()).await?))
}

/// `GET /api/stories/{id}/comments`: newest first.
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentWithAuthor>>> {
    let id = story_id(&id)?;
    Ok(Json(engagement::list_comments(&state.pool, id).await?))
}

/// `POST /api/stories/{id}/comments`
pub async fn add_comment_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<CommentWithAuthor>)> {
    let id = story_id(&id)?;
    let comment = engagement::add_comment(&state.pool, user.id(), id, &body.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `POST /api/stories/{id}/bookmark`
pub async fn bookmark_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Bookmark>)> {
    let id = story_id(&id)?;
    let bookmark = engagement::bookmark(&state.pool, user.id(), id).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// `DELETE /api/stories/{id}/bookmark`
pub async fn unbookmark_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = story_id(&id)?;
    engagement::unbookmark(&state.pool, user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/stories/{id}/bookmark-status`
pub async fn bookmark_status_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<BookmarkStatus>> {
    let id = story_id(&id)?;
    let is_bookmarked = engagement::is_bookmarked(&state.pool, user.id(), id).await?;
    Ok(Json(BookmarkStatus { is_bookmarked }))
}

/// `GET /api/bookmarks`: the caller's saved stories, most recent save first.
pub async fn bookmarks_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<StoryWithAuthor>>> {
    Ok(Json(
        engagement::list_bookmarked_stories(&state.pool, user.id()).await?,
    ))
}
