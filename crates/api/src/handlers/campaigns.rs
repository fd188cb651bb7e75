//! Handlers for the `/admin/campaigns` resource.
//!
//! A campaign pins one template version and optionally one form schema
//! version. The pins may change freely while the campaign is a draft and lock
//! the first time it leaves draft.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_core::content::EntityKind;
use pagedesk_core::error::CoreError;
use pagedesk_core::lifecycle::{
    check_reference_change, ensure_live_reference, transition, PublicationStatus,
};
use pagedesk_core::slugs::{self, normalize_slug};
use pagedesk_core::structure::AssetKind;
use pagedesk_core::trackers::{validate_override_ids, validate_priority, TrackerOverride};
use pagedesk_core::types::DbId;
use pagedesk_db::models::campaign::{
    Campaign, CampaignAssetRefs, CreateCampaign, ReplaceCampaignTrackers, UpdateCampaign,
};
use pagedesk_db::models::versioned_asset::VersionedAsset;
use pagedesk_db::repositories::{
    CampaignRepo, CampaignTrackerRepo, TrackerRepo, VersionedAssetRepo,
};
use serde_json::Value;
use sqlx::PgConnection;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::content::{
    ensure_entity_exists, normalize_seo_input, resolve_slug, StatusRequest,
};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::query::ContentListParams;
use crate::registrar::{self, PathOwner};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id,
    })
}

fn validation(msg: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Validation(msg.into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_prefix(raw: &str) -> AppResult<String> {
    let prefix = normalize_slug(raw);
    if prefix.is_empty() {
        return Err(validation(
            "url_prefix must contain at least one letter or digit",
        ));
    }
    Ok(prefix)
}

fn validate_content(content: Option<&Value>) -> AppResult<()> {
    match content {
        Some(value) if !value.is_object() => Err(validation("content must be a JSON object")),
        _ => Ok(()),
    }
}

async fn find_asset(
    conn: &mut PgConnection,
    kind: AssetKind,
    id: DbId,
) -> AppResult<VersionedAsset> {
    VersionedAssetRepo::find_by_id(&mut *conn, kind, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: kind.label(),
            id,
        }))
}

/// Look up the referenced template and form schema and pin their versions.
///
/// `template_version`, when given, must match the referenced row.
async fn resolve_refs(
    conn: &mut PgConnection,
    template_id: Option<DbId>,
    template_version: Option<i32>,
    form_schema_id: Option<DbId>,
) -> AppResult<CampaignAssetRefs> {
    let mut refs = CampaignAssetRefs::default();

    match (template_id, template_version) {
        (Some(id), requested) => {
            let template = find_asset(&mut *conn, AssetKind::Template, id).await?;
            if let Some(requested) = requested.filter(|v| *v != template.version) {
                return Err(validation(format!(
                    "template_version {requested} does not match template {id} (version {})",
                    template.version
                )));
            }
            refs.template_id = Some(id);
            refs.template_version = Some(template.version);
        }
        (None, Some(_)) => return Err(validation("template_version requires template_id")),
        (None, None) => {}
    }

    if let Some(id) = form_schema_id {
        let form = find_asset(&mut *conn, AssetKind::FormSchema, id).await?;
        refs.form_schema_id = Some(id);
        refs.form_schema_version = Some(form.version);
    }

    Ok(refs)
}

/// Check a campaign's pins can back a live page and, on its first go-live,
/// count the campaign against each pinned version.
async fn prepare_go_live(conn: &mut PgConnection, campaign: &Campaign) -> AppResult<()> {
    let template_id = campaign
        .template_id
        .ok_or_else(|| validation("A campaign needs a template before going live"))?;
    let template = find_asset(&mut *conn, AssetKind::Template, template_id).await?;
    ensure_live_reference(AssetKind::Template, template.version, template.status)?;

    let form = match campaign.form_schema_id {
        Some(id) => {
            let form = find_asset(&mut *conn, AssetKind::FormSchema, id).await?;
            ensure_live_reference(AssetKind::FormSchema, form.version, form.status)?;
            Some(form)
        }
        None => None,
    };

    if campaign.published_at.is_none() {
        VersionedAssetRepo::increment_usage(&mut *conn, AssetKind::Template, template.id).await?;
        if let Some(form) = form {
            VersionedAssetRepo::increment_usage(&mut *conn, AssetKind::FormSchema, form.id)
                .await?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/campaigns
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ContentListParams>,
) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignRepo::list(&state.pool, &params.into()).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/admin/campaigns
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(mut input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_content(input.content.as_ref())?;
    input.seo = normalize_seo_input(input.seo.as_ref())?;

    match (input.entity_type, input.entity_id) {
        (Some(kind), Some(entity_id)) => {
            if kind == EntityKind::Campaign {
                return Err(validation(
                    "A campaign can only link to an exam, college or scholarship",
                ));
            }
            ensure_entity_exists(&state.pool, kind, entity_id).await?;
        }
        (None, None) => {}
        _ => return Err(validation("entity_type and entity_id must be given together")),
    }

    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let url_prefix = normalize_prefix(&input.url_prefix)?;
    let path = slugs::full_path(&url_prefix, &slug)?;

    let mut tx = state.pool.begin().await?;
    let refs = resolve_refs(
        &mut *tx,
        input.template_id,
        input.template_version,
        input.form_schema_id,
    )
    .await?;
    let campaign = CampaignRepo::create(&mut *tx, &input, &slug, &url_prefix, &path, &refs).await?;
    let owner = PathOwner {
        kind: EntityKind::Campaign,
        id: campaign.id,
        name: &campaign.name,
    };
    registrar::reserve(&mut *tx, &path, &owner, false).await?;
    tx.commit().await?;

    tracing::info!(
        campaign_id = campaign.id,
        user_id = user.user_id,
        path = %campaign.full_path,
        "Campaign created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/admin/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PATCH /api/admin/campaigns/{id}
///
/// Reference changes are rejected once the campaign has left draft. A slug
/// or prefix change moves the campaign to a new path.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_content(input.content.as_ref())?;
    input.seo = normalize_seo_input(input.seo.as_ref())?;

    let mut tx = state.pool.begin().await?;
    let current = CampaignRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    check_reference_change(current.status, &current.refs(), &input.requested_refs())?;

    let template_requested = input.template_id.is_some() || input.template_version.is_some();
    let refs = resolve_refs(
        &mut *tx,
        if template_requested {
            input.template_id.or(current.template_id)
        } else {
            None
        },
        input.template_version,
        input.form_schema_id,
    )
    .await?;

    let name = input.name.clone().unwrap_or_else(|| current.name.clone());
    let owner = PathOwner {
        kind: EntityKind::Campaign,
        id,
        name: &name,
    };

    let mut new_path: Option<(String, String, String)> = None;
    if input.slug.is_some() || input.url_prefix.is_some() {
        let slug = match input.slug.as_deref() {
            Some(raw) => resolve_slug(Some(raw), &name)?,
            None => current.slug.clone(),
        };
        let url_prefix = match input.url_prefix.as_deref() {
            Some(raw) => normalize_prefix(raw)?,
            None => current.url_prefix.clone(),
        };
        let path = slugs::full_path(&url_prefix, &slug)?;
        if path != current.full_path {
            if current.status == PublicationStatus::Archived {
                return Err(AppError::Core(CoreError::Conflict(
                    "An archived campaign cannot change its path".into(),
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
        }
        new_path = Some((slug, url_prefix, path));
    }

    let campaign = CampaignRepo::update(
        &mut *tx,
        id,
        &input,
        new_path
            .as_ref()
            .map(|(slug, prefix, path)| (slug.as_str(), prefix.as_str(), path.as_str())),
        &refs,
    )
    .await?
    .ok_or_else(|| not_found(id))?;
    if campaign.name != current.name {
        registrar::rename(&mut *tx, &owner).await?;
    }
    tx.commit().await?;

    tracing::info!(campaign_id = id, user_id = user.user_id, "Campaign updated");

    Ok(Json(DataResponse { data: campaign }))
}

/// POST /api/admin/campaigns/{id}/status
///
/// Going live requires a published template (and a published form schema,
/// if one is pinned) and activates the campaign's path.
pub async fn set_status(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = CampaignRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let next = transition(current.status, input.status)?;

    if next == PublicationStatus::Live {
        prepare_go_live(&mut *tx, &current).await?;
    }

    let campaign = CampaignRepo::set_status(&mut *tx, id, next)
        .await?
        .ok_or_else(|| not_found(id))?;
    registrar::sync_status(&mut *tx, &campaign.full_path, next).await?;
    tx.commit().await?;

    tracing::info!(
        campaign_id = id,
        user_id = user.user_id,
        from = %current.status,
        to = %next,
        "Campaign status changed"
    );

    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/admin/campaigns/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let current = CampaignRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    CampaignRepo::delete(&mut *tx, id).await?;
    registrar::release(&mut *tx, &current.full_path).await?;
    tx.commit().await?;

    tracing::info!(campaign_id = id, user_id = user.user_id, "Campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/campaigns/{id}/trackers
pub async fn list_trackers(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let overrides = CampaignTrackerRepo::list_for_campaign(&state.pool, id).await?;
    Ok(Json(DataResponse { data: overrides }))
}

/// PUT /api/admin/campaigns/{id}/trackers
///
/// Replaces the campaign's override list. List order becomes `sort_order`;
/// an override without a priority inherits the tracker's own.
pub async fn replace_trackers(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceCampaignTrackers>,
) -> AppResult<impl IntoResponse> {
    let ids: Vec<DbId> = input.trackers.iter().map(|t| t.tracker_id).collect();
    validate_override_ids(&ids)?;
    for priority in input.trackers.iter().filter_map(|t| t.priority) {
        validate_priority(priority)?;
    }

    let mut tx = state.pool.begin().await?;
    CampaignRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let trackers = TrackerRepo::list_by_ids(&mut *tx, &ids).await?;
    let overrides = input
        .trackers
        .iter()
        .map(|item| {
            let tracker = trackers
                .iter()
                .find(|t| t.id == item.tracker_id)
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Tracker",
                    id: item.tracker_id,
                }))?;
            Ok(TrackerOverride {
                tracker_id: tracker.id,
                enabled: item.enabled,
                priority: item.priority.unwrap_or(tracker.priority),
                load_position: tracker.load_position,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    CampaignTrackerRepo::replace(&mut *tx, id, &overrides).await?;
    let stored = CampaignTrackerRepo::list_for_campaign(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(
        campaign_id = id,
        user_id = user.user_id,
        overrides = stored.len(),
        "Campaign trackers replaced"
    );

    Ok(Json(DataResponse { data: stored }))
}
