//! Story and feed request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use vibenest_core::feed::{self, SearchFilter};
use vibenest_core::models::story::{Story, StoryDraft, StoryWithAuthor};
use vibenest_core::stories;

use super::story_id;
use crate::AppState;
use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthenticatedUser;

/// Query string of `GET /api/stories/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// `POST /api/stories`: publish a story as the caller.
pub async fn create_story_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    AppJson(body): AppJson<StoryDraft>,
) -> AppResult<(StatusCode, Json<Story>)> {
    let story = stories::create_story(&state.pool, user.id(), body).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

/// `GET /api/stories`: every story, newest first.
pub async fn list_stories_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StoryWithAuthor>>> {
    Ok(Json(feed::full_feed(&state.pool).await?))
}

/// `GET /api/stories/my`: the caller's own stories.
pub async fn my_stories_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<Story>>> {
    Ok(Json(stories::list_user_stories(&state.pool, user.id()).await?))
}

/// `GET /api/stories/search?q=&category=`
pub async fn search_stories_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<StoryWithAuthor>>> {
    let filter = SearchFilter::new(params.q.as_deref(), params.category.as_deref());
    Ok(Json(feed::search_stories(&state.pool, &filter).await?))
}

/// `GET /api/stories/personalized`: followed authors first.
pub async fn personalized_feed_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<StoryWithAuthor>>> {
    Ok(Json(feed::personalized_feed(&state.pool, user.id()).await?))
}

/// `GET /api/stories/{id}`
pub async fn get_story_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StoryWithAuthor>> {
    let id = story_id(&id)?;
    Ok(Json(stories::get_story(&state.pool, id).await?))
}

/// `PATCH /api/stories/{id}`: edit a story the caller wrote.
pub async fn update_story_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<StoryDraft>,
) -> AppResult<Json<Story>> {
    let id = story_id(&id)?;
    Ok(Json(stories::update_story(&state.pool, id, user.id(), body).await?))
}

/// `DELETE /api/stories/{id}`: delete a story the caller wrote.
pub async fn delete_story_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = story_id(&id)?;
    stories::delete_story(&state.pool, id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
