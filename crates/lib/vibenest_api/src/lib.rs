//! # vibenest_api
//!
//! HTTP API library for VibeNest.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, engagement, health, profile, stories, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_API_HEALTH, get(health::health))
        .route(routes::POST_API_AUTH_LOGOUT, post(auth::logout_handler))
        .route(
            routes::POST_API_AUTH_MOBILE_EXCHANGE,
            post(auth::mobile_exchange_handler),
        );

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_API_AUTH_USER, get(auth::current_user_handler))
        .route(
            routes::POST_API_AUTH_MOBILE_HANDOFF,
            post(auth::mobile_handoff_handler),
        )
        .route(routes::PATCH_API_PROFILE, patch(profile::update_profile_handler))
        .route(routes::GET_API_STORIES, get(stories::list_stories_handler))
        .route(routes::POST_API_STORIES, post(stories::create_story_handler))
        .route(routes::GET_API_STORIES_MY, get(stories::my_stories_handler))
        .route(routes::GET_API_STORIES_SEARCH, get(stories::search_stories_handler))
        .route(
            routes::GET_API_STORIES_PERSONALIZED,
            get(stories::personalized_feed_handler),
        )
        .route(routes::GET_API_STORIES_ID, get(stories::get_story_handler))
        .route(routes::PATCH_API_STORIES_ID, patch(stories::update_story_handler))
        .route(
            routes::DELETE_API_STORIES_ID,
            delete(stories::delete_story_handler),
        )
        .route(routes::POST_API_STORIES_ID_LIKE, post(engagement::like_handler))
        .route(
            routes::DELETE_API_STORIES_ID_LIKE,
            delete(engagement::unlike_handler),
        )
        .route(routes::GET_API_STORIES_ID_LIKES, get(engagement::likes_handler))
        .route(
            routes::GET_API_STORIES_ID_COMMENTS,
            get(engagement::list_comments_handler),
        )
        .route(
            routes::POST_API_STORIES_ID_COMMENTS,
            post(engagement::add_comment_handler),
        )
        .route(
            routes::POST_API_STORIES_ID_BOOKMARK,
            post(engagement::bookmark_handler),
        )
        .route(
            routes::DELETE_API_STORIES_ID_BOOKMARK,
            delete(engagement::unbookmark_handler),
        )
        .route(
            routes::GET_API_STORIES_ID_BOOKMARK_STATUS,
            get(engagement::bookmark_status_handler),
        )
        .route(routes::GET_API_BOOKMARKS, get(engagement::bookmarks_handler))
        .route(routes::POST_API_USERS_ID_FOLLOW, post(users::follow_handler))
        .route(
            routes::DELETE_API_USERS_ID_FOLLOW,
            delete(users::unfollow_handler),
        )
        .route(
            routes::GET_API_USERS_ID_FOLLOW_STATUS,
            get(users::follow_status_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
