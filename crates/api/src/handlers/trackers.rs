//! Handlers for the `/admin/trackers` resource and tracker resolution.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_core::content::EntityKind;
use pagedesk_core::error::CoreError;
use pagedesk_core::trackers::{
    resolve as resolve_trackers, validate_binding, validate_code, validate_priority,
    InjectionPlan, LoadPosition, TrackerOverride, TrackerScope,
};
use pagedesk_core::types::DbId;
use pagedesk_db::models::tracker::{CreateTracker, Tracker, TrackerListFilter, UpdateTracker};
use pagedesk_db::repositories::{CampaignRepo, CampaignTrackerRepo, TrackerRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::content::ensure_entity_exists;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/trackers`.
#[derive(Debug, Default, Deserialize)]
pub struct TrackerListParams {
    pub scope: Option<TrackerScope>,
    pub entity_type: Option<EntityKind>,
    pub entity_id: Option<DbId>,
    #[serde(default)]
    pub include_inactive: bool,
}

impl From<TrackerListParams> for TrackerListFilter {
    fn from(params: TrackerListParams) -> Self {
        TrackerListFilter {
            scope: params.scope,
            entity_type: params.entity_type,
            entity_id: params.entity_id,
            include_inactive: params.include_inactive,
        }
    }
}

/// Query parameters for `GET /admin/trackers/resolve`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveParams {
    pub entity_type: Option<EntityKind>,
    pub entity_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
}

/// One tracker of a resolved page, ready for injection.
#[derive(Debug, Serialize)]
pub struct InjectedTracker {
    pub tracker_id: DbId,
    pub name: String,
    pub provider: String,
    pub code: String,
    /// The scope whose settings won.
    pub scope: TrackerScope,
    pub priority: i32,
    pub load_position: LoadPosition,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Tracker",
        id,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/admin/trackers
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<TrackerListParams>,
) -> AppResult<impl IntoResponse> {
    let trackers = TrackerRepo::list(&state.pool, &params.into()).await?;
    Ok(Json(DataResponse { data: trackers }))
}

/// POST /api/admin/trackers
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateTracker>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_code(&input.code)?;
    if let Some(priority) = input.priority {
        validate_priority(priority)?;
    }
    validate_binding(
        input.scope,
        input.entity_type.map(|k| k.as_str()),
        input.entity_id,
    )?;
    if let (Some(kind), Some(entity_id)) = (input.entity_type, input.entity_id) {
        if !kind.accepts_entity_trackers() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Trackers cannot be bound to a {kind}; use campaign overrides instead"
            ))));
        }
        ensure_entity_exists(&state.pool, kind, entity_id).await?;
    }

    let tracker = TrackerRepo::create(&state.pool, &input).await?;

    tracing::info!(
        tracker_id = tracker.id,
        scope = %tracker.scope,
        user_id = user.user_id,
        "Tracker created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: tracker })))
}

/// GET /api/admin/trackers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tracker = TrackerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: tracker }))
}

/// PATCH /api/admin/trackers/{id}
///
/// Scope and entity binding are fixed at creation.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTracker>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(code) = &input.code {
        validate_code(code)?;
    }
    if let Some(priority) = input.priority {
        validate_priority(priority)?;
    }

    let tracker = TrackerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(tracker_id = id, user_id = user.user_id, "Tracker updated");

    Ok(Json(DataResponse { data: tracker }))
}

/// DELETE /api/admin/trackers/{id}
///
/// Hard delete; campaign overrides of the tracker go with it.
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TrackerRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(tracker_id = id, user_id = user.user_id, "Tracker deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// GET /api/admin/trackers/resolve
///
/// Resolves the trackers a page would inject and buckets them by load
/// position. With `campaign_id`, the campaign's overrides apply and its
/// linked entity is used unless an entity is given explicitly.
pub async fn resolve(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ResolveParams>,
) -> AppResult<impl IntoResponse> {
    let mut entity = match (params.entity_type, params.entity_id) {
        (Some(kind), Some(id)) => Some((kind, id)),
        (None, None) => None,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "entity_type and entity_id must be given together".into(),
            )))
        }
    };

    let mut overrides: Vec<TrackerOverride> = Vec::new();
    if let Some(campaign_id) = params.campaign_id {
        let campaign = CampaignRepo::find_by_id(&state.pool, campaign_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Campaign",
                id: campaign_id,
            }))?;
        entity = entity.or_else(|| campaign.entity());
        overrides = CampaignTrackerRepo::list_for_campaign(&state.pool, campaign_id)
            .await?
            .iter()
            .map(|ct| ct.to_override())
            .collect();
    }

    let global = TrackerRepo::list_global(&state.pool).await?;
    let scoped = match entity {
        Some((kind, id)) => TrackerRepo::list_for_entity(&state.pool, kind.as_str(), id).await?,
        None => Vec::new(),
    };

    let global_refs: Vec<_> = global.iter().map(Tracker::as_ref).collect();
    let scoped_refs: Vec<_> = scoped.iter().map(Tracker::as_ref).collect();
    let resolved = resolve_trackers(&global_refs, &scoped_refs, &overrides);

    let mut by_id: HashMap<DbId, Tracker> = global
        .into_iter()
        .chain(scoped)
        .map(|t| (t.id, t))
        .collect();
    let missing: Vec<DbId> = resolved
        .iter()
        .map(|r| r.tracker_id)
        .filter(|id| !by_id.contains_key(id))
        .collect();
    for tracker in TrackerRepo::list_by_ids(&state.pool, &missing).await? {
        by_id.insert(tracker.id, tracker);
    }

    let injected = resolved.into_iter().filter_map(|r| {
        let tracker = by_id.remove(&r.tracker_id)?;
        Some(InjectedTracker {
            tracker_id: r.tracker_id,
            name: tracker.name,
            provider: tracker.provider,
            code: tracker.code,
            scope: r.scope,
            priority: r.priority,
            load_position: r.load_position,
        })
    });
    let plan = InjectionPlan::bucket(injected, |t| t.load_position);

    Ok(Json(DataResponse { data: plan }))
}
