//! Handlers for the `/admin/redirects` resource and the public redirect
//! lookup.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_core::error::CoreError;
use pagedesk_core::redirects::{check_loop, validate_redirect, REDIRECT_PERMANENT};
use pagedesk_core::types::DbId;
use pagedesk_db::models::redirect::{CreateRedirect, UpdateRedirect};
use pagedesk_db::repositories::RedirectRepo;
use pagedesk_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /redirects/lookup`.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub path: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Redirect",
        id,
    })
}

/// Reject a redirect whose target already redirects back to its source.
async fn ensure_no_loop(pool: &DbPool, source_path: &str, target_path: &str) -> AppResult<()> {
    let onward = RedirectRepo::find_by_source(pool, target_path).await?;
    check_loop(source_path, onward.as_ref().map(|r| r.target_path.as_str()))?;
    Ok(())
}

/// GET /api/admin/redirects
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let redirects = RedirectRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: redirects }))
}

/// POST /api/admin/redirects
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateRedirect>,
) -> AppResult<impl IntoResponse> {
    validate_redirect(
        &input.source_path,
        &input.target_path,
        input.redirect_type.unwrap_or(REDIRECT_PERMANENT),
    )?;
    ensure_no_loop(&state.pool, &input.source_path, &input.target_path).await?;

    let redirect = RedirectRepo::create(&state.pool, &input).await?;

    tracing::info!(
        redirect_id = redirect.id,
        source = %redirect.source_path,
        target = %redirect.target_path,
        user_id = user.user_id,
        "Redirect created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: redirect })))
}

/// GET /api/admin/redirects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let redirect = RedirectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: redirect }))
}

/// PATCH /api/admin/redirects/{id}
///
/// The source path is fixed; delete and recreate to move it.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRedirect>,
) -> AppResult<impl IntoResponse> {
    let current = RedirectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let target_path = input.target_path.as_deref().unwrap_or(&current.target_path);
    validate_redirect(
        &current.source_path,
        target_path,
        input.redirect_type.unwrap_or(current.redirect_type),
    )?;
    if target_path != current.target_path {
        ensure_no_loop(&state.pool, &current.source_path, target_path).await?;
    }

    let redirect = RedirectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(redirect_id = id, user_id = user.user_id, "Redirect updated");

    Ok(Json(DataResponse { data: redirect }))
}

/// DELETE /api/admin/redirects/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RedirectRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(redirect_id = id, user_id = user.user_id, "Redirect deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/redirects/lookup?path=
///
/// Public. Returns the active redirect for a path and counts the hit.
pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> AppResult<impl IntoResponse> {
    let redirect = RedirectRepo::record_hit(&state.pool, params.path.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No redirect for '{}'", params.path)))?;

    tracing::debug!(redirect_id = redirect.id, hits = redirect.hit_count, "Redirect hit");

    Ok(Json(DataResponse { data: redirect }))
}
