//! Handlers for the `/admin/exams` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_core::content::{validate_exam_dates, validate_url, EntityKind};
use pagedesk_core::error::CoreError;
use pagedesk_core::lifecycle::{transition, PublicationStatus};
use pagedesk_core::types::DbId;
use pagedesk_db::models::exam::{CreateExam, Exam, UpdateExam};
use pagedesk_db::repositories::{ExamRepo, TrackerRepo};
use pagedesk_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::content::{
    entity_path, normalize_seo_input, resolve_slug, run_import, ImportRequest, StatusRequest,
};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::query::ContentListParams;
use crate::registrar::{self, PathOwner};
use crate::response::DataResponse;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Exam;

/// Columns an exam import must declare.
const IMPORT_REQUIRED_COLUMNS: &[&str] = &["name"];

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Exam", id })
}

/// Validate and insert one exam together with its path reservation.
async fn insert_exam(pool: &DbPool, mut input: CreateExam) -> AppResult<Exam> {
    input.validate()?;
    validate_exam_dates(
        input.registration_start,
        input.registration_end,
        input.exam_date,
    )?;
    validate_url("official_url", input.official_url.as_deref())?;
    input.seo = normalize_seo_input(input.seo.as_ref())?;

    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let path = entity_path(KIND, &slug)?;

    let mut tx = pool.begin().await?;
    let exam = ExamRepo::create(&mut *tx, &input, &slug, &path).await?;
    let owner = PathOwner {
        kind: KIND,
        id: exam.id,
        name: &exam.name,
    };
    registrar::reserve(&mut *tx, &path, &owner, false).await?;
    tx.commit().await?;
    Ok(exam)
}

/// GET /api/admin/exams
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ContentListParams>,
) -> AppResult<impl IntoResponse> {
    let exams = ExamRepo::list(&state.pool, &params.into()).await?;
    Ok(Json(DataResponse { data: exams }))
}

/// POST /api/admin/exams
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateExam>,
) -> AppResult<impl IntoResponse> {
    let exam = insert_exam(&state.pool, input).await?;

    tracing::info!(
        exam_id = exam.id,
        user_id = user.user_id,
        path = %exam.full_path,
        "Exam created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: exam })))
}

/// GET /api/admin/exams/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let exam = ExamRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: exam }))
}

/// PATCH /api/admin/exams/{id}
///
/// A slug change moves the exam to a new path; the old path is retired and,
/// if it was public, redirected.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateExam>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_url("official_url", input.official_url.as_deref())?;
    input.seo = normalize_seo_input(input.seo.as_ref())?;

    let mut tx = state.pool.begin().await?;
    let current = ExamRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    validate_exam_dates(
        input.registration_start.or(current.registration_start),
        input.registration_end.or(current.registration_end),
        input.exam_date.or(current.exam_date),
    )?;

    let name = input.name.clone().unwrap_or_else(|| current.name.clone());
    let owner = PathOwner {
        kind: KIND,
        id,
        name: &name,
    };

    let mut new_path = None;
    if let Some(raw) = input.slug.as_deref() {
        let slug = resolve_slug(Some(raw), &name)?;
        let path = entity_path(KIND, &slug)?;
        if path != current.full_path {
            if current.status == PublicationStatus::Archived {
                return Err(AppError::Core(CoreError::Conflict(
                    "An archived exam cannot change its path".into(),
                )));
            }
            registrar::change_path(
                &mut *tx,
                &current.full_path,
                &path,
                &owner,
                current.status.is_public(),
            )
            .await?;
            new_path = Some(path);
        }
        input.slug = Some(slug);
    }

    let exam = ExamRepo::update(&mut *tx, id, &input, new_path.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    if exam.name != current.name {
        registrar::rename(&mut *tx, &owner).await?;
    }
    tx.commit().await?;

    tracing::info!(exam_id = id, user_id = user.user_id, "Exam updated");

    Ok(Json(DataResponse { data: exam }))
}

/// POST /api/admin/exams/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = ExamRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let next = transition(current.status, input.status)?;

    let exam = ExamRepo::set_status(&mut *tx, id, next)
        .await?
        .ok_or_else(|| not_found(id))?;
    registrar::sync_status(&mut *tx, &exam.full_path, next).await?;
    tx.commit().await?;

    tracing::info!(
        exam_id = id,
        user_id = user.user_id,
        from = %current.status,
        to = %next,
        "Exam status changed"
    );

    Ok(Json(DataResponse { data: exam }))
}

/// DELETE /api/admin/exams/{id}
///
/// Retires the exam's path and removes trackers bound to it.
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = ExamRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ExamRepo::delete(&mut *tx, id).await?;
    registrar::release(&mut *tx, &current.full_path).await?;
    let trackers = TrackerRepo::delete_for_entity(&mut *tx, KIND.as_str(), id).await?;
    tx.commit().await?;

    tracing::info!(
        exam_id = id,
        user_id = user.user_id,
        trackers_removed = trackers,
        "Exam deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/exams/import
pub async fn import(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let summary = run_import(input, IMPORT_REQUIRED_COLUMNS, |row: CreateExam| async move {
        insert_exam(pool, row).await.map(|_| ())
    })
    .await?;

    tracing::info!(
        user_id = user.user_id,
        total = summary.total(),
        success = summary.success,
        failed = summary.failed,
        "Exam import finished"
    );

    Ok(Json(DataResponse { data: summary }))
}
