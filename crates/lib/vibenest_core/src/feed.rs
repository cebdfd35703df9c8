//! Feed composition: the full feed, the follow-aware personalized feed, and
//! the search feed.
//!
//! Personalization is a two-bucket stable reorder, not a ranking: stories by
//! followed authors move ahead of everything else, and each bucket keeps the
//! newest-first order the store returned.

use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::models::story::{Category, StoryWithAuthor};
use crate::social::{self, SocialError};
use crate::stories::{NEWEST_FIRST, STORY_WITH_AUTHOR_SELECT, StoryAuthorRow};

/// Sentinel category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Feed read errors.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Social(#[from] SocialError),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Every story with its author, newest first.
pub async fn full_feed(pool: &PgPool) -> Result<Vec<StoryWithAuthor>, FeedError> {
    let rows = sqlx::query_as::<_, StoryAuthorRow>(&format!(
        "{STORY_WITH_AUTHOR_SELECT} {NEWEST_FIRST}"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// The full feed with followed authors' stories first.
///
/// The follow-set read and the story read are separate round trips; a follow
/// racing this call may show up in one and not the other.
pub async fn personalized_feed(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<StoryWithAuthor>, FeedError> {
    let followed = social::following_ids(pool, user_id).await?;
    let stories = full_feed(pool).await?;
    if followed.is_empty() {
        debug!(user_id, stories = stories.len(), "cold start: serving full feed");
        return Ok(stories);
    }
    debug!(
        user_id,
        followed = followed.len(),
        stories = stories.len(),
        "personalizing feed"
    );
    Ok(followed_first(stories, &followed))
}

/// Stable partition: stories whose author is in `followed` first, relative
/// order preserved inside both buckets.
pub fn followed_first(
    stories: Vec<StoryWithAuthor>,
    followed: &HashSet<String>,
) -> Vec<StoryWithAuthor> {
    let (mut first, rest): (Vec<_>, Vec<_>) = stories
        .into_iter()
        .partition(|s| followed.contains(&s.story.author_id));
    first.extend(rest);
    first
}

/// Category predicate of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Absent or the `"all"` sentinel.
    Any,
    Only(Category),
    /// A value no stored story can carry; matches nothing.
    Unmatchable,
}

/// Parsed search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    /// Query text exactly as given; `None` when empty.
    pub query: Option<String>,
    pub category: CategoryFilter,
}

impl SearchFilter {
    pub fn new(query: Option<&str>, category: Option<&str>) -> Self {
        let query = query.filter(|q| !q.is_empty()).map(str::to_string);

        let category = match category.map(str::trim) {
            None | Some("") => CategoryFilter::Any,
            Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => CategoryFilter::Any,
            Some(c) => c
                .parse::<Category>()
                .map(CategoryFilter::Only)
                .unwrap_or(CategoryFilter::Unmatchable),
        };

        Self { query, category }
    }
}

/// Escape `%`, `_` and `\` so user text is matched literally by `ILIKE`.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring search on title or content, optionally
/// restricted to one category, newest first.
pub async fn search_stories(
    pool: &PgPool,
    filter: &SearchFilter,
) -> Result<Vec<StoryWithAuthor>, FeedError> {
    let category = match &filter.category {
        CategoryFilter::Unmatchable => return Ok(Vec::new()),
        CategoryFilter::Any => None,
        CategoryFilter::Only(c) => Some(c.as_str()),
    };
    let pattern = filter.query.as_deref().map(like_pattern);

    // NULL parameters disable their predicate.
    let rows = sqlx::query_as::<_, StoryAuthorRow>(&format!(
        "{STORY_WITH_AUTHOR_SELECT} \
         WHERE ($1::text IS NULL \
                OR s.title ILIKE $1 ESCAPE '\\' \
                OR s.content ILIKE $1 ESCAPE '\\') \
           AND ($2::text IS NULL OR s.category = $2) \
         {NEWEST_FIRST}"
    ))
    .bind(pattern)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
