//! HTTP-level tests for login, logout and role enforcement.

mod common;

use axum::http::{header, StatusCode};
use common::{
    body_json, create_user, expect_json, get, get_auth, post_json, post_json_auth, token_for,
    TEST_PASSWORD,
};
use pagedesk_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_sets_cookie_and_returns_token(pool: PgPool) {
    let user = create_user(&pool, "editor@pagedesk.test", "editor").await;
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "editor@pagedesk.test", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["role"], "editor");
    assert!(json["data"]["user"].get("password_hash").is_none());

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_401(pool: PgPool) {
    create_user(&pool, "editor@pagedesk.test", "editor").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "editor@pagedesk.test", "password": "not-the-password" }),
    )
    .await;
    let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_unknown_email_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "ghost@pagedesk.test", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_accepts_cookie_session(pool: PgPool) {
    let user = create_user(&pool, "viewer@pagedesk.test", "viewer").await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("theme=dark; auth_token={token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["email"], "viewer@pagedesk.test");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/admin/exams").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/exams", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_can_read_but_not_write(pool: PgPool) {
    let viewer = create_user(&pool, "viewer@pagedesk.test", "viewer").await;
    let token = token_for(&viewer);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/admin/exams", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/admin/exams", json!({ "name": "JEE Main" }), &token).await;
    let json = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_clears_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/logout", json!({})).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
}
