//! HTTP-level tests for the template / form schema version lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, delete_auth, expect_json, get_auth, patch_json_auth, post_auth, post_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_template(pool: &PgPool, token: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/templates", body, token).await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

fn id_of(v: &Value) -> i64 {
    v["id"].as_i64().expect("id")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_at_version_one_draft(pool: PgPool) {
    let token = admin_token(&pool).await;
    let template = create_template(&pool, &token, json!({ "name": "Landing Page" })).await;

    assert_eq!(template["slug"], "landing-page");
    assert_eq!(template["version"], 1);
    assert_eq!(template["status"], "draft");
    assert_eq!(template["structure"], json!({ "sections": [] }));
    assert_eq!(template["summary"]["element_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_slug_is_409(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_template(&pool, &token, json!({ "name": "Landing Page" })).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/admin/templates",
        json!({ "name": "Another", "slug": "landing-page" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_structure_is_400(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/admin/form-schemas",
        json!({ "name": "Lead Form", "structure": { "sections": [] } }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publishing_an_empty_draft_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let template = create_template(&pool, &token, json!({ "name": "Empty" })).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/admin/templates/{}/publish", id_of(&template));
    let response = post_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_version_lifecycle(pool: PgPool) {
    let token = admin_token(&pool).await;
    let v1 = create_template(
        &pool,
        &token,
        json!({ "name": "Landing Page", "structure": { "sections": [{ "type": "hero" }] } }),
    )
    .await;
    let v1_id = id_of(&v1);

    // Publish v1.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/admin/templates/{v1_id}/publish"), &token).await;
    let published = expect_json(response, StatusCode::OK).await;
    assert_eq!(published["data"]["status"], "published");
    assert!(published["data"]["published_at"].is_string());
    assert_eq!(published["data"]["retired_versions"], json!([]));

    // Publishing again conflicts.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/admin/templates/{v1_id}/publish"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Published versions are read-only and cannot be deleted.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/admin/templates/{v1_id}"),
        json!({ "name": "Renamed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/admin/templates/{v1_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // New version copies the structure.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/admin/templates/{v1_id}/versions"), &token).await;
    let v2 = expect_json(response, StatusCode::CREATED).await["data"].clone();
    assert_eq!(v2["version"], 2);
    assert_eq!(v2["status"], "draft");
    assert_eq!(v2["structure"], v1["structure"]);

    // A second draft is a version conflict.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/admin/templates/{v1_id}/versions"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Edit and publish v2, which retires v1.
    let v2_id = id_of(&v2);
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/admin/templates/{v2_id}"),
        json!({ "structure": { "sections": [{ "type": "hero" }, { "type": "faq" }] } }),
        &token,
    )
    .await;
    let edited = expect_json(response, StatusCode::OK).await;
    assert_eq!(edited["data"]["summary"]["element_count"], 2);

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/admin/templates/{v2_id}/publish"), &token).await;
    let published = expect_json(response, StatusCode::OK).await;
    assert_eq!(published["data"]["retired_versions"], json!([1]));

    // History, newest first.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/templates/by-slug/landing-page/versions", &token).await;
    let history = expect_json(response, StatusCode::OK).await;
    let statuses: Vec<_> = history["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| (v["version"].as_i64().unwrap(), v["status"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        statuses,
        vec![(2, "published".to_string()), (1, "retired".to_string())]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn drafts_can_be_discarded(pool: PgPool) {
    let token = admin_token(&pool).await;
    let draft = create_template(&pool, &token, json!({ "name": "Scratch" })).await;
    let uri = format!("/api/admin/templates/{}", id_of(&draft));

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn templates_and_form_schemas_are_separate(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_template(&pool, &token, json!({ "name": "Shared Name" })).await;

    // Same slug is free in the other table.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/admin/form-schemas",
        json!({ "name": "Shared Name" }),
        &token,
    )
    .await;
    let form = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(form["data"]["structure"], json!({ "fields": [] }));

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/form-schemas?slug=shared-name", &token).await;
    let listed = expect_json(response, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}
