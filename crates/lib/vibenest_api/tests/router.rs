//! Router tests that never reach the database: the auth gate, input
//! validation and id parsing all reject before the first query.

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use vibenest_api::config::ApiConfig;
use vibenest_api::{AppState, router};
use vibenest_core::auth::jwt::generate_access_token;
use vibenest_core::models::user::UserIdentity;

const SECRET: &str = "router-test-secret";
const USER_ID: &str = "user-router-test";

fn app() -> Router {
    // Nothing below should connect; a lazy pool to a dead address proves it.
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    router(AppState {
        pool,
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: "postgres://nobody@127.0.0.1:1/none".into(),
            jwt_secret: SECRET.into(),
            session_ttl_secs: 3600,
            handoff_ttl_secs: 300,
            mobile_redirect_base: "vibenest://auth/callback".into(),
            secure_cookies: false,
        },
    })
}

fn token() -> String {
    let identity = UserIdentity {
        id: USER_ID.into(),
        first_name: Some("Router".into()),
        ..Default::default()
    };
    generate_access_token(&identity, 3600, SECRET.as_bytes()).expect("token")
}

fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token()));
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("parse JSON")
    };
    (status, json)
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let req = Request::builder()
        .uri("/api/stories")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn bad_tokens_are_rejected() {
    for header in [
        "Bearer not-a-jwt".to_string(),
        "Basic dXNlcjpwYXNz".to_string(),
    ] {
        let req = Request::builder()
            .uri("/api/stories/personalized")
            .header(AUTHORIZATION, header)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let identity = UserIdentity {
        id: USER_ID.into(),
        ..Default::default()
    };
    let forged = generate_access_token(&identity, 3600, b"other-secret").unwrap();
    let req = Request::builder()
        .uri("/api/bookmarks")
        .header(AUTHORIZATION, format!("Bearer {forged}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_passes_the_gate() {
    let req = Request::builder()
        .uri("/api/stories/not-a-uuid")
        .header(COOKIE, format!("vibenest_session={}", token()))
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn malformed_story_id_is_not_found() {
    let (status, _) = send(request(Method::GET, "/api/stories/42", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(request(Method::DELETE, "/api/stories/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(request(Method::POST, "/api/stories/nope/like", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_story_is_a_validation_error() {
    let body = serde_json::json!({
        "title": "",
        "content": "Once upon a time",
        "category": "poetry",
    });
    let (status, json) = send(request(Method::POST, "/api/stories", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("Title is required"), "{message}");
    assert!(
        message.contains("Category must be fictional, real, or both"),
        "{message}"
    );
}

#[tokio::test]
async fn story_edit_is_validated_before_ownership() {
    let uri = format!("/api/stories/{}", uuid::Uuid::now_v7());
    let body = serde_json::json!({
        "title": "t",
        "content": "c",
        "category": "real",
        "musicUrl": "not a url",
    });
    let (status, json) = send(request(Method::PATCH, &uri, Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("Must be a valid URL"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/stories")
        .header(AUTHORIZATION, format!("Bearer {}", token()))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn self_follow_is_a_conflict() {
    let uri = format!("/api/users/{USER_ID}/follow");
    let (status, json) = send(request(Method::POST, &uri, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "conflict");
    assert_eq!(json["message"], "You cannot follow yourself");
}

#[tokio::test]
async fn overlong_comment_is_rejected() {
    let uri = format!("/api/stories/{}/comments", uuid::Uuid::now_v7());
    let body = serde_json::json!({ "content": "x".repeat(1001) });
    let (status, json) = send(request(Method::POST, &uri, Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("Comment is too long"));
}

#[tokio::test]
async fn overlong_bio_is_rejected() {
    let body = serde_json::json!({ "bio": "b".repeat(501) });
    let (status, json) = send(request(Method::PATCH, "/api/profile", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("Bio must be under 500 characters")
    );
}

#[tokio::test]
async fn mobile_exchange_requires_a_token() {
    for body in [serde_json::json!({ "token": "" }), serde_json::json!({})] {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/mobile-exchange")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, json) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Token is required");
    }
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookie = resp
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(cookie.starts_with("vibenest_session="), "{cookie}");
    assert!(cookie.contains("Max-Age=0"), "{cookie}");
}
