//! Shared fixtures for the PostgreSQL-backed tests.
//!
//! Tests run against `TEST_DATABASE_URL` (or `DATABASE_URL`). Without either
//! they return early, so `cargo test` stays green on machines with no
//! PostgreSQL. Every fixture uses fresh ids, so tests can share one database.

#![allow(dead_code)]

use sqlx::PgPool;
use uuid::Uuid;
use vibenest_core::db::PoolSettings;
use vibenest_core::models::story::{Story, StoryDraft, StoryWithAuthor};
use vibenest_core::models::user::{User, UserIdentity};

pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;
    let pool = PoolSettings::new(url)
        .max_connections(4)
        .connect()
        .await
        .expect("connect + migrate test database");
    Some(pool)
}

pub async fn user(pool: &PgPool, first_name: &str) -> User {
    let identity = UserIdentity {
        id: format!("test-{}", Uuid::new_v4()),
        email: None,
        first_name: Some(first_name.to_string()),
        last_name: Some("Tester".to_string()),
        profile_image_url: None,
    };
    vibenest_core::users::upsert_user(pool, &identity)
        .await
        .expect("upsert user")
}

pub fn draft(title: &str, content: &str, category: &str) -> StoryDraft {
    StoryDraft {
        title: title.to_string(),
        caption: None,
        content: content.to_string(),
        category: category.to_string(),
        music_url: None,
    }
}

pub async fn story(pool: &PgPool, author: &User, title: &str, category: &str) -> Story {
    vibenest_core::stories::create_story(
        pool,
        &author.id,
        draft(title, &format!("{title} content"), category),
    )
    .await
    .expect("create story")
}

/// Restrict a feed to the given authors, keeping order. Other tests write to
/// the same tables concurrently.
pub fn only_by(feed: Vec<StoryWithAuthor>, authors: &[&User]) -> Vec<StoryWithAuthor> {
    feed.into_iter()
        .filter(|s| authors.iter().any(|a| a.id == s.story.author_id))
        .collect()
}

pub fn ids(feed: &[StoryWithAuthor]) -> Vec<Uuid> {
    feed.iter().map(|s| s.story.id).collect()
}
