//! HTTP-level tests for tracker management and resolution.

mod common;

use axum::http::StatusCode;
use common::{admin_token, delete_auth, expect_json, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn post(pool: &PgPool, uri: &str, body: Value, token: &str) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, uri, body, token).await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

async fn resolve(pool: &PgPool, query: &str, token: &str) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/admin/trackers/resolve?{query}"), token).await;
    expect_json(response, StatusCode::OK).await["data"].clone()
}

fn ids(bucket: &Value) -> Vec<i64> {
    bucket
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tracker_id"].as_i64().unwrap())
        .collect()
}

struct Fixture {
    exam_id: i64,
    campaign_id: i64,
    global_a: i64,
    entity_b: i64,
}

/// Global A (priority 1), entity B on an exam (priority 5) and a campaign
/// linked to that exam.
async fn fixture(pool: &PgPool, token: &str) -> Fixture {
    let exam = post(pool, "/api/admin/exams", json!({ "name": "JEE Main" }), token).await;
    let exam_id = exam["id"].as_i64().unwrap();

    let a = post(
        pool,
        "/api/admin/trackers",
        json!({ "name": "GA", "scope": "global", "code": "<script>ga()</script>", "priority": 1 }),
        token,
    )
    .await;
    let b = post(
        pool,
        "/api/admin/trackers",
        json!({
            "name": "Pixel",
            "scope": "entity",
            "entity_type": "exam",
            "entity_id": exam_id,
            "code": "<script>px()</script>",
            "priority": 5
        }),
        token,
    )
    .await;
    let campaign = post(
        pool,
        "/api/admin/campaigns",
        json!({ "name": "JEE Ads", "url_prefix": "ad", "entity_type": "exam", "entity_id": exam_id }),
        token,
    )
    .await;

    Fixture {
        exam_id,
        campaign_id: campaign["id"].as_i64().unwrap(),
        global_a: a["id"].as_i64().unwrap(),
        entity_b: b["id"].as_i64().unwrap(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entity_page_orders_by_priority(pool: PgPool) {
    let token = admin_token(&pool).await;
    let f = fixture(&pool, &token).await;

    let plan = resolve(&pool, &format!("entity_type=exam&entity_id={}", f.exam_id), &token).await;
    assert_eq!(ids(&plan["head"]), vec![f.entity_b, f.global_a]);
    assert_eq!(plan["head"][0]["scope"], "entity");
    assert_eq!(plan["head"][0]["code"], "<script>px()</script>");
    assert_eq!(plan["body_end"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn page_without_entity_gets_globals_only(pool: PgPool) {
    let token = admin_token(&pool).await;
    let f = fixture(&pool, &token).await;

    let plan = resolve(&pool, "", &token).await;
    assert_eq!(ids(&plan["head"]), vec![f.global_a]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabled_override_removes_tracker(pool: PgPool) {
    let token = admin_token(&pool).await;
    let f = fixture(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/admin/campaigns/{}/trackers", f.campaign_id),
        json!({ "trackers": [{ "tracker_id": f.global_a, "enabled": false }] }),
        &token,
    )
    .await;
    let stored = expect_json(response, StatusCode::OK).await;
    assert_eq!(stored["data"][0]["enabled"], false);
    assert_eq!(stored["data"][0]["priority"], 1);

    // The campaign inherits its exam's trackers, minus the disabled one.
    let plan = resolve(&pool, &format!("campaign_id={}", f.campaign_id), &token).await;
    assert_eq!(ids(&plan["head"]), vec![f.entity_b]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn enabled_override_reprioritises(pool: PgPool) {
    let token = admin_token(&pool).await;
    let f = fixture(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/admin/campaigns/{}/trackers", f.campaign_id),
        json!({ "trackers": [{ "tracker_id": f.global_a, "priority": 10 }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let plan = resolve(&pool, &format!("campaign_id={}", f.campaign_id), &token).await;
    assert_eq!(ids(&plan["head"]), vec![f.global_a, f.entity_b]);
    assert_eq!(plan["head"][0]["scope"], "campaign");
    assert_eq!(plan["head"][0]["priority"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn override_list_rejects_duplicates_and_unknown_ids(pool: PgPool) {
    let token = admin_token(&pool).await;
    let f = fixture(&pool, &token).await;
    let uri = format!("/api/admin/campaigns/{}/trackers", f.campaign_id);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &uri,
        json!({ "trackers": [{ "tracker_id": f.global_a }, { "tracker_id": f.global_a }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &uri,
        json!({ "trackers": [{ "tracker_id": 424242 }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entity_tracker_requires_binding(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/admin/trackers",
        json!({ "name": "Pixel", "scope": "entity", "code": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_exam_drops_its_trackers(pool: PgPool) {
    let token = admin_token(&pool).await;
    let f = fixture(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/admin/exams/{}", f.exam_id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/admin/trackers/{}", f.entity_b), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
