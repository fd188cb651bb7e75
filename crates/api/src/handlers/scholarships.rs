//! Handlers for the `/admin/scholarships` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_core::content::{validate_amount_range, validate_url, EntityKind};
use pagedesk_core::error::CoreError;
use pagedesk_core::lifecycle::{transition, PublicationStatus};
use pagedesk_core::types::DbId;
use pagedesk_db::models::scholarship::{CreateScholarship, Scholarship, UpdateScholarship};
use pagedesk_db::repositories::{ScholarshipRepo, TrackerRepo};
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

const KIND: EntityKind = EntityKind::Scholarship;

/// Columns a scholarship import must declare.
const IMPORT_REQUIRED_COLUMNS: &[&str] = &["name"];

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Scholarship", id })
}

/// Validate and insert one scholarship together with its path reservation.
async fn insert_scholarship(
    pool: &DbPool,
    mut input: CreateScholarship,
) -> AppResult<Scholarship> {
    input.validate()?;
    validate_amount_range(input.amount_min, input.amount_max)?;
    validate_url("official_url", input.official_url.as_deref())?;
    input.seo = normalize_seo_input(input.seo.as_ref())?;

    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let path = entity_path(KIND, &slug)?;

    let mut tx = pool.begin().await?;
    let scholarship = ScholarshipRepo::create(&mut *tx, &input, &slug, &path).await?;
    let owner = PathOwner {
        kind: KIND,
        id: scholarship.id,
        name: &scholarship.name,
    };
    registrar::reserve(&mut *tx, &path, &owner, false).await?;
    tx.commit().await?;
    Ok(scholarship)
}

/// GET /api/admin/scholarships
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ContentListParams>,
) -> AppResult<impl IntoResponse> {
    let scholarships = ScholarshipRepo::list(&state.pool, &params.into()).await?;
    Ok(Json(DataResponse { data: scholarships }))
}

/// POST /api/admin/scholarships
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateScholarship>,
) -> AppResult<impl IntoResponse> {
    let scholarship = insert_scholarship(&state.pool, input).await?;

    tracing::info!(
        scholarship_id = scholarship.id,
        user_id = user.user_id,
        path = %scholarship.full_path,
        "Scholarship created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: scholarship })))
}

/// GET /api/admin/scholarships/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let scholarship = ScholarshipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: scholarship }))
}

/// PATCH /api/admin/scholarships/{id}
///
/// A slug change moves the scholarship to a new path; the old path is retired and,
/// if it was public, redirected.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateScholarship>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_url("official_url", input.official_url.as_deref())?;
    input.seo = normalize_seo_input(input.seo.as_ref())?;

    let mut tx = state.pool.begin().await?;
    let current = ScholarshipRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    validate_amount_range(
        input.amount_min.or(current.amount_min),
        input.amount_max.or(current.amount_max),
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
                    "An archived scholarship cannot change its path".into(),
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

    let scholarship = ScholarshipRepo::update(&mut *tx, id, &input, new_path.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    if scholarship.name != current.name {
        registrar::rename(&mut *tx, &owner).await?;
    }
    tx.commit().await?;

    tracing::info!(scholarship_id = id, user_id = user.user_id, "Scholarship updated");

    Ok(Json(DataResponse { data: scholarship }))
}

/// POST /api/admin/scholarships/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = ScholarshipRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let next = transition(current.status, input.status)?;

    let scholarship = ScholarshipRepo::set_status(&mut *tx, id, next)
        .await?
        .ok_or_else(|| not_found(id))?;
    registrar::sync_status(&mut *tx, &scholarship.full_path, next).await?;
    tx.commit().await?;

    tracing::info!(
        scholarship_id = id,
        user_id = user.user_id,
        from = %current.status,
        to = %next,
        "Scholarship status changed"
    );

    Ok(Json(DataResponse { data: scholarship }))
}

/// DELETE /api/admin/scholarships/{id}
///
/// Retires the scholarship's path and removes trackers bound to it.
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = ScholarshipRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ScholarshipRepo::delete(&mut *tx, id).await?;
    registrar::release(&mut *tx, &current.full_path).await?;
    let trackers = TrackerRepo::delete_for_entity(&mut *tx, KIND.as_str(), id).await?;
    tx.commit().await?;

    tracing::info!(
        scholarship_id = id,
        user_id = user.user_id,
        trackers_removed = trackers,
        "Scholarship deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/scholarships/import
pub async fn import(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let summary = run_import(input, IMPORT_REQUIRED_COLUMNS, |row: CreateScholarship| async move {
        insert_scholarship(pool, row).await.map(|_| ())
    })
    .await?;

    tracing::info!(
        user_id = user.user_id,
        total = summary.total(),
        success = summary.success,
        failed = summary.failed,
        "Scholarship import finished"
    );

    Ok(Json(DataResponse { data: summary }))
}
