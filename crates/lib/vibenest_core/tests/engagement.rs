//! Likes, comments and bookmarks against PostgreSQL.

mod common;

use uuid::Uuid;
use vibenest_core::engagement::{self, EngagementError};

#[tokio::test]
async fn storm_scenario_likes_and_comments() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let u1 = common::user(&pool, "U1").await;
    let u2 = common::user(&pool, "U2").await;
    let u3 = common::user(&pool, "U3").await;
    let s1 = vibenest_core::stories::create_story(
        &pool,
        &u1.id,
        common::draft("Storm", "The sky cracked open.", "real"),
    )
    .await
    .unwrap();

    engagement::like(&pool, &u2.id, s1.id).await.unwrap();

    let for_u2 = engagement::like_summary(&pool, s1.id, &u2.id).await.unwrap();
    assert_eq!(for_u2.count, 1);
    assert!(for_u2.is_liked);
    let for_u3 = engagement::like_summary(&pool, s1.id, &u3.id).await.unwrap();
    assert_eq!(for_u3.count, 1);
    assert!(!for_u3.is_liked);

    let comment = engagement::add_comment(&pool, &u2.id, s1.id, "Nice").await.unwrap();
    assert_eq!(comment.comment.content, "Nice");
    assert_eq!(comment.author.id, u2.id);

    let comments = engagement::list_comments(&pool, s1.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.content, "Nice");
    assert_eq!(comments[0].author.id, u2.id);
    assert_eq!(comments[0].author.first_name.as_deref(), Some("U2"));
}

#[tokio::test]
async fn like_then_unlike_restores_count_and_double_like_fails() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let author = common::user(&pool, "Author").await;
    let reader = common::user(&pool, "Reader").await;
    let story = common::story(&pool, &author, "Tide", "fictional").await;

    let before = engagement::like_count(&pool, story.id).await.unwrap();
    engagement::like(&pool, &reader.id, story.id).await.unwrap();
    let err = engagement::like(&pool, &reader.id, story.id).await.unwrap_err();
    assert!(matches!(err, EngagementError::AlreadyLiked));
    assert_eq!(engagement::like_count(&pool, story.id).await.unwrap(), before + 1);

    engagement::unlike(&pool, &reader.id, story.id).await.unwrap();
    assert_eq!(engagement::like_count(&pool, story.id).await.unwrap(), before);
    // idempotent
    engagement::unlike(&pool, &reader.id, story.id).await.unwrap();
}

#[tokio::test]
async fn liking_a_missing_story_is_not_found() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let reader = common::user(&pool, "Reader").await;
    let err = engagement::like(&pool, &reader.id, Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, EngagementError::StoryNotFound));
}

#[tokio::test]
async fn invalid_comment_never_reaches_the_store() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let author = common::user(&pool, "Author").await;
    let story = common::story(&pool, &author, "Quiet", "both").await;

    let err = engagement::add_comment(&pool, &author.id, story.id, "")
        .await
        .unwrap_err();
    assert!(matches!(err, EngagementError::Validation(_)));
    let long = "x".repeat(1001);
    let err = engagement::add_comment(&pool, &author.id, story.id, &long)
        .await
        .unwrap_err();
    assert!(matches!(err, EngagementError::Validation(_)));
    assert!(engagement::list_comments(&pool, story.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn comments_are_newest_first() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let author = common::user(&pool, "Author").await;
    let story = common::story(&pool, &author, "Echo", "real").await;
    for text in ["first", "second", "third"] {
        engagement::add_comment(&pool, &author.id, story.id, text).await.unwrap();
    }
    let contents: Vec<_> = engagement::list_comments(&pool, story.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.comment.content)
        .collect();
    assert_eq!(contents, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn bookmarks_are_unique_and_listed_by_save_time() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let author = common::user(&pool, "Author").await;
    let reader = common::user(&pool, "Reader").await;
    let older = common::story(&pool, &author, "Older", "real").await;
    let newer = common::story(&pool, &author, "Newer", "real").await;

    // Saved in reverse creation order.
    engagement::bookmark(&pool, &reader.id, newer.id).await.unwrap();
    engagement::bookmark(&pool, &reader.id, older.id).await.unwrap();
    let err = engagement::bookmark(&pool, &reader.id, older.id).await.unwrap_err();
    assert!(matches!(err, EngagementError::AlreadyBookmarked));

    assert!(engagement::is_bookmarked(&pool, &reader.id, older.id).await.unwrap());
    assert!(!engagement::is_bookmarked(&pool, &author.id, older.id).await.unwrap());

    let saved = engagement::list_bookmarked_stories(&pool, &reader.id).await.unwrap();
    assert_eq!(common::ids(&saved), vec![older.id, newer.id]);
    assert_eq!(saved[0].author.id, author.id);

    engagement::unbookmark(&pool, &reader.id, older.id).await.unwrap();
    let saved = engagement::list_bookmarked_stories(&pool, &reader.id).await.unwrap();
    assert_eq!(common::ids(&saved), vec![newer.id]);
}

#[tokio::test]
async fn unsynced_requester_is_not_a_missing_story() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let author = common::user(&pool, "Author").await;
    let story = common::story(&pool, &author, "Present", "real").await;
    let ghost = format!("never-synced-{}", Uuid::new_v4());

    let err = engagement::like(&pool, &ghost, story.id).await.unwrap_err();
    assert!(matches!(err, EngagementError::UnknownUser), "{err:?}");
    let err = engagement::bookmark(&pool, &ghost, story.id).await.unwrap_err();
    assert!(matches!(err, EngagementError::UnknownUser), "{err:?}");
    let err = engagement::add_comment(&pool, &ghost, story.id, "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, EngagementError::UnknownUser), "{err:?}");

    // A synced requester on a missing story still reads as a missing story.
    let err = engagement::bookmark(&pool, &author.id, Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, EngagementError::StoryNotFound), "{err:?}");
    let err = engagement::add_comment(&pool, &author.id, Uuid::now_v7(), "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, EngagementError::StoryNotFound), "{err:?}");
}
