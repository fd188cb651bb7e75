//! HTTP-level tests for redirect management, public lookup and the
//! dashboard summary.

mod common;

use axum::http::StatusCode;
use common::{admin_token, delete_auth, expect_json, get, get_auth, patch_json_auth, post_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(pool: &PgPool, body: Value, token: &str) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json_auth(app, "/api/admin/redirects", body, token).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_to_permanent(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = create(&pool, json!({ "source_path": "/old", "target_path": "/new" }), &token).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["redirect_type"], 301);
    assert_eq!(json["data"]["is_active"], true);
    assert_eq!(json["data"]["hit_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_redirects_are_400(pool: PgPool) {
    let token = admin_token(&pool).await;
    for body in [
        json!({ "source_path": "/same", "target_path": "/same" }),
        json!({ "source_path": "old", "target_path": "/new" }),
        json!({ "source_path": "/old", "target_path": "/new", "redirect_type": 307 }),
    ] {
        let response = create(&pool, body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_source_is_409(pool: PgPool) {
    let token = admin_token(&pool).await;
    let body = json!({ "source_path": "/old", "target_path": "/new" });
    assert_eq!(create(&pool, body.clone(), &token).await.status(), StatusCode::CREATED);
    assert_eq!(create(&pool, body, &token).await.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn two_hop_loop_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = create(&pool, json!({ "source_path": "/a", "target_path": "/b" }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = create(&pool, json!({ "source_path": "/b", "target_path": "/a" }), &token).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().contains("loop"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lookup_counts_hits_and_skips_inactive(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = create(&pool, json!({ "source_path": "/old", "target_path": "/new" }), &token).await;
    let id = expect_json(response, StatusCode::CREATED).await["data"]["id"]
        .as_i64()
        .unwrap();

    for expected in 1..=2 {
        let app = common::build_test_app(pool.clone());
        let response = get(app, "/api/redirects/lookup?path=/old").await;
        let json = expect_json(response, StatusCode::OK).await;
        assert_eq!(json["data"]["hit_count"], expected);
    }

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/admin/redirects/{id}"),
        json!({ "is_active": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/redirects/lookup?path=/old").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/admin/redirects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/admin/redirects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analytics_summary_counts_by_status(pool: PgPool) {
    let token = admin_token(&pool).await;
    for name in ["JEE Main", "NEET"] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/admin/exams", json!({ "name": name }), &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    create(&pool, json!({ "source_path": "/old", "target_path": "/new" }), &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/analytics/summary", &token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["resources"]["exam"]["draft"], 2);
    assert_eq!(json["data"]["redirects"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moving_onto_redirected_path_replaces_the_redirect(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/exams", json!({ "name": "Alpha" }), &token).await;
    let id = expect_json(response, StatusCode::CREATED).await["data"]["id"]
        .as_i64()
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/admin/exams/{id}/status"),
        json!({ "status": "live" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = create(
        &pool,
        json!({ "source_path": "/exams/beta", "target_path": "/exams/alpha" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/admin/exams/{id}"),
        json!({ "slug": "beta" }),
        &token,
    )
    .await;
    let exam = expect_json(response, StatusCode::OK).await;
    assert_eq!(exam["data"]["full_path"], "/exams/beta");

    // The exam's new page is no longer shadowed.
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/redirects/lookup?path=/exams/beta").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/redirects/lookup?path=/exams/alpha").await;
    let redirect = expect_json(response, StatusCode::OK).await;
    assert_eq!(redirect["data"]["target_path"], "/exams/beta");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/redirects", &token).await;
    let all = expect_json(response, StatusCode::OK).await;
    let all = all["data"].as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["source_path"], "/exams/alpha");
}
