//! Handlers for versioned assets, mounted twice: at `/admin/templates` and
//! at `/admin/form-schemas`.
//!
//! The router attaches the [`AssetKind`] as an [`Extension`] so one set of
//! handlers serves both tables.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use pagedesk_core::error::CoreError;
use pagedesk_core::lifecycle::{
    can_discard, ensure_editable, plan_new_version, publish as publish_policy,
    retire as retire_policy, superseded_versions, AssetStatus,
};
use pagedesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use pagedesk_core::structure::{summarize, validate_shape, AssetKind, StructureSummary};
use pagedesk_core::types::DbId;
use pagedesk_db::models::versioned_asset::{
    CreateVersionedAsset, UpdateVersionedAsset, VersionedAsset,
};
use pagedesk_db::repositories::versioned_asset_repo::NewAssetVersion;
use pagedesk_db::repositories::VersionedAssetRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::content::resolve_slug;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /`.
#[derive(Debug, Deserialize)]
pub struct AssetListParams {
    pub slug: Option<String>,
    pub status: Option<AssetStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A version together with a summary of its structure.
#[derive(Debug, Serialize)]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: VersionedAsset,
    pub summary: StructureSummary,
}

impl AssetView {
    fn new(kind: AssetKind, asset: VersionedAsset) -> Self {
        let summary = summarize(kind, &asset.structure);
        Self { asset, summary }
    }
}

/// Response for `POST /{id}/publish`.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    #[serde(flatten)]
    pub asset: AssetView,
    /// Earlier versions of the slug retired by this publish.
    pub retired_versions: Vec<i32>,
}

fn not_found(kind: AssetKind, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: kind.label(),
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/{templates|form-schemas}
pub async fn list(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    let assets = VersionedAssetRepo::list(
        &state.pool,
        kind,
        params.slug.as_deref(),
        params.status,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    let data: Vec<AssetView> = assets.into_iter().map(|a| AssetView::new(kind, a)).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/admin/{templates|form-schemas}
///
/// Creates version 1 of a new slug as a draft. Existing slugs grow through
/// `POST /{id}/versions` instead.
pub async fn create(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateVersionedAsset>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let structure = input
        .structure
        .clone()
        .unwrap_or_else(|| json!({ kind.element_key(): [] }));
    validate_shape(kind, &structure)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;

    if VersionedAssetRepo::find_latest(&state.pool, kind, &slug)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "{} '{slug}' already exists; create a new version instead",
            kind.label()
        ))));
    }

    let asset = VersionedAssetRepo::create_draft(
        &state.pool,
        kind,
        &NewAssetVersion {
            slug: &slug,
            name: &input.name,
            description: input.description.as_deref(),
            version: 1,
            structure: &structure,
            created_by: Some(user.user_id),
        },
    )
    .await?;

    tracing::info!(
        asset_id = asset.id,
        kind = %kind,
        slug = %asset.slug,
        user_id = user.user_id,
        "Versioned asset created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AssetView::new(kind, asset),
        }),
    ))
}

/// GET /api/admin/{templates|form-schemas}/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = VersionedAssetRepo::find_by_id(&state.pool, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    Ok(Json(DataResponse {
        data: AssetView::new(kind, asset),
    }))
}

/// PATCH /api/admin/{templates|form-schemas}/{id}
///
/// Only drafts are editable; a published or retired version answers 409.
pub async fn update(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVersionedAsset>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(structure) = &input.structure {
        validate_shape(kind, structure)?;
    }

    let mut tx = state.pool.begin().await?;
    let current = VersionedAssetRepo::find_by_id_for_update(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    ensure_editable(current.status)?;

    let asset = VersionedAssetRepo::update_draft(&mut *tx, kind, id, &input)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    tx.commit().await?;

    tracing::info!(asset_id = id, kind = %kind, user_id = user.user_id, "Draft updated");

    Ok(Json(DataResponse {
        data: AssetView::new(kind, asset),
    }))
}

/// DELETE /api/admin/{templates|form-schemas}/{id}
///
/// Discards a draft. Published and retired versions are kept.
pub async fn delete(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = VersionedAssetRepo::find_by_id_for_update(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    if !can_discard(current.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A {} version cannot be deleted",
            current.status
        ))));
    }

    VersionedAssetRepo::delete_draft(&mut *tx, kind, id).await?;
    tx.commit().await?;

    tracing::info!(asset_id = id, kind = %kind, user_id = user.user_id, "Draft discarded");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/{templates|form-schemas}/{id}/publish
///
/// Publishes a draft and retires every other published version of the slug.
pub async fn publish(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = VersionedAssetRepo::find_by_id_for_update(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    publish_policy(kind, current.status, &current.structure)?;

    let siblings = VersionedAssetRepo::list_versions(&mut *tx, kind, &current.slug).await?;
    let summaries: Vec<_> = siblings.iter().map(VersionedAsset::summary).collect();
    let superseded = superseded_versions(&summaries, current.version);

    let asset = VersionedAssetRepo::mark_published(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    VersionedAssetRepo::retire_versions(&mut *tx, kind, &current.slug, &superseded).await?;
    tx.commit().await?;

    tracing::info!(
        asset_id = id,
        kind = %kind,
        slug = %asset.slug,
        version = asset.version,
        retired = ?superseded,
        user_id = user.user_id,
        "Version published"
    );

    Ok(Json(DataResponse {
        data: PublishResponse {
            asset: AssetView::new(kind, asset),
            retired_versions: superseded,
        },
    }))
}

/// POST /api/admin/{templates|form-schemas}/{id}/retire
pub async fn retire(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = VersionedAssetRepo::find_by_id_for_update(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    retire_policy(current.status)?;

    let asset = VersionedAssetRepo::mark_retired(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;
    tx.commit().await?;

    tracing::info!(asset_id = id, kind = %kind, user_id = user.user_id, "Version retired");

    Ok(Json(DataResponse {
        data: AssetView::new(kind, asset),
    }))
}

/// POST /api/admin/{templates|form-schemas}/{id}/versions
///
/// Starts a new draft of this version's slug, copying the structure of the
/// slug's latest version. Fails with 409 while a draft exists.
pub async fn new_version(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let source = VersionedAssetRepo::find_by_id(&mut *tx, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;

    let versions = VersionedAssetRepo::list_versions(&mut *tx, kind, &source.slug).await?;
    let summaries: Vec<_> = versions.iter().map(VersionedAsset::summary).collect();
    let next = plan_new_version(&summaries)?;
    let latest = versions.first().unwrap_or(&source);

    let asset = VersionedAssetRepo::create_draft(
        &mut *tx,
        kind,
        &NewAssetVersion {
            slug: &latest.slug,
            name: &latest.name,
            description: latest.description.as_deref(),
            version: next,
            structure: &latest.structure,
            created_by: Some(user.user_id),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        asset_id = asset.id,
        kind = %kind,
        slug = %asset.slug,
        version = asset.version,
        user_id = user.user_id,
        "New draft version created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AssetView::new(kind, asset),
        }),
    ))
}

/// GET /api/admin/{templates|form-schemas}/by-slug/{slug}/versions
pub async fn versions_by_slug(
    State(state): State<AppState>,
    Extension(kind): Extension<AssetKind>,
    RequireAuth(_user): RequireAuth,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let versions = VersionedAssetRepo::list_versions(&state.pool, kind, &slug).await?;
    if versions.is_empty() {
        return Err(AppError::NotFound(format!(
            "{} '{slug}' not found",
            kind.label()
        )));
    }
    let data: Vec<AssetView> = versions
        .into_iter()
        .map(|a| AssetView::new(kind, a))
        .collect();
    Ok(Json(DataResponse { data }))
}
