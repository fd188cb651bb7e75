//! HTTP-level tests for exams, colleges and scholarships: path registration,
//! slug changes, validation and bulk import.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    admin_token, delete_auth, expect_json, get, get_auth, patch_json_auth, post_json_auth,
};
use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::slugs::SlugStatus;
use pagedesk_db::repositories::{ExamRepo, SlugRepo};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn post(pool: &PgPool, uri: &str, body: Value, token: &str) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json_auth(app, uri, body, token).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exam_create_registers_draft_path(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(&pool, "/api/admin/exams", json!({ "name": "JEE Main 2026" }), &token).await;
    let exam = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(exam["data"]["slug"], "jee-main-2026");
    assert_eq!(exam["data"]["full_path"], "/exams/jee-main-2026");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/seo/slugs?entity_type=exam", &token).await;
    let slugs = expect_json(response, StatusCode::OK).await;
    assert_eq!(slugs["data"][0]["full_path"], "/exams/jee-main-2026");
    assert_eq!(slugs["data"][0]["status"], "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exam_dates_are_validated(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(
        &pool,
        "/api/admin/exams",
        json!({
            "name": "NEET",
            "registration_start": "2026-03-10",
            "registration_end": "2026-03-01"
        }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().contains("registration_start"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scholarship_amounts_are_validated(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(
        &pool,
        "/api/admin/scholarships",
        json!({ "name": "Merit Award", "amount_min": 50000, "amount_max": 1000 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_seo_blob_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(
        &pool,
        "/api/admin/colleges",
        json!({ "name": "IIT Delhi", "seo": { "meta_title": "IIT", "unknown": true } }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_slug_in_different_sections_is_fine(pool: PgPool) {
    let token = admin_token(&pool).await;
    let body = json!({ "name": "Delhi" });
    let response = post(&pool, "/api/admin/colleges", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = post(&pool, "/api/admin/scholarships", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = post(&pool, "/api/admin/colleges", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn live_slug_change_creates_redirect_and_retires_old_path(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(&pool, "/api/admin/exams", json!({ "name": "JEE Main" }), &token).await;
    let exam = expect_json(response, StatusCode::CREATED).await;
    let id = exam["data"]["id"].as_i64().unwrap();

    let response = post(
        &pool,
        &format!("/api/admin/exams/{id}/status"),
        json!({ "status": "live" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/admin/exams/{id}"),
        json!({ "slug": "jee-main-2026" }),
        &token,
    )
    .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert_eq!(updated["data"]["full_path"], "/exams/jee-main-2026");

    // Public lookup follows the automatic 301.
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/redirects/lookup?path=/exams/jee-main").await;
    let redirect = expect_json(response, StatusCode::OK).await;
    assert_eq!(redirect["data"]["target_path"], "/exams/jee-main-2026");
    assert_eq!(redirect["data"]["redirect_type"], 301);
    assert_eq!(redirect["data"]["hit_count"], 1);

    // The old path is retired for everyone.
    let response = post(&pool, "/api/admin/exams", json!({ "name": "JEE Main" }), &token).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert!(json["error"].as_str().unwrap().contains("retired"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_exam_path_is_never_reissued(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(&pool, "/api/admin/exams", json!({ "name": "GATE" }), &token).await;
    let exam = expect_json(response, StatusCode::CREATED).await;
    let id = exam["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/admin/exams/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/admin/seo/slugs/check?path=exams/GATE", &token).await;
    let check = expect_json(response, StatusCode::OK).await;
    assert_eq!(check["data"]["full_path"], "/exams/gate");
    assert_eq!(check["data"]["status"], "retired");

    let response = post(&pool, "/api/admin/exams", json!({ "name": "GATE" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_reports_row_failures_and_keeps_going(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(
        &pool,
        "/api/admin/colleges/import",
        json!({
            "columns": ["name", "city", "established_year"],
            "rows": [
                { "name": "IIT Bombay", "city": "Mumbai", "established_year": 1958 },
                { "name": "Future College", "established_year": 3000 },
                { "city": "Nowhere" },
                { "name": "IIT Bombay" },
                { "name": "IISc", "ignored_column": "x" }
            ]
        }),
        &token,
    )
    .await;
    let summary = expect_json(response, StatusCode::OK).await;
    assert_eq!(summary["data"]["success"], 2);
    assert_eq!(summary["data"]["failed"], 3);
    let failed_rows: Vec<i64> = summary["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["row"].as_i64().unwrap())
        .collect();
    assert_eq!(failed_rows, vec![2, 3, 4]);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/colleges", &token).await;
    let listed = expect_json(response, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_without_required_column_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(
        &pool,
        "/api/admin/exams/import",
        json!({ "columns": ["slug"], "rows": [{ "slug": "x" }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seo_audit_flags_missing_fields(pool: PgPool) {
    let token = admin_token(&pool).await;
    post(
        &pool,
        "/api/admin/exams",
        json!({ "name": "Complete", "seo": { "meta_title": "T", "meta_description": "D" } }),
        &token,
    )
    .await;
    post(
        &pool,
        "/api/admin/exams",
        json!({ "name": "Bare", "seo": { "meta_title": "Only title" } }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/seo/audit", &token).await;
    let audit = expect_json(response, StatusCode::OK).await;
    let entries = audit["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Bare");
    assert_eq!(entries[0]["missing"], json!(["meta_description"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_change_waits_for_concurrent_archive(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = post(&pool, "/api/admin/exams", json!({ "name": "Race Exam" }), &token).await;
    let exam = expect_json(response, StatusCode::CREATED).await;
    let id = exam["data"]["id"].as_i64().unwrap();

    // Another writer archives the exam and holds its transaction open.
    let mut tx = pool.begin().await.unwrap();
    ExamRepo::find_by_id_for_update(&mut *tx, id)
        .await
        .unwrap()
        .unwrap();
    ExamRepo::set_status(&mut *tx, id, PublicationStatus::Archived)
        .await
        .unwrap();
    SlugRepo::set_status(&mut *tx, "/exams/race-exam", SlugStatus::Retired)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/admin/exams/{id}/status");
    let live_token = token.clone();
    let pending = tokio::spawn(async move {
        post_json_auth(app, &uri, json!({ "status": "live" }), &live_token).await
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    let response = pending.await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/admin/exams/{id}"), &token).await;
    let exam = expect_json(response, StatusCode::OK).await;
    assert_eq!(exam["data"]["status"], "archived");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/seo/slugs/check?path=/exams/race-exam", &token).await;
    let check = expect_json(response, StatusCode::OK).await;
    assert_eq!(check["data"]["status"], "retired");
}
