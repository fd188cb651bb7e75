//! Handlers for `/admin/seo`: the slug registry and the SEO audit.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_core::content::EntityKind;
use pagedesk_core::error::CoreError;
use pagedesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use pagedesk_core::seo::parse_seo;
use pagedesk_core::slugs::{normalize_path, Availability, SlugStatus};
use pagedesk_core::types::{DbId, Timestamp};
use pagedesk_db::models::slug_record::SlugListFilter;
use pagedesk_db::repositories::{AnalyticsRepo, SlugRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::registrar;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /admin/seo/slugs`.
#[derive(Debug, Deserialize)]
pub struct SlugListParams {
    pub status: Option<SlugStatus>,
    pub entity_type: Option<EntityKind>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /admin/seo/slugs/check`.
#[derive(Debug, Deserialize)]
pub struct SlugCheckParams {
    pub path: String,
    /// The entity asking, whose own path counts as available.
    pub entity_type: Option<EntityKind>,
    pub entity_id: Option<DbId>,
}

/// Response for `GET /admin/seo/slugs/check`.
#[derive(Debug, Serialize)]
pub struct SlugCheckResponse {
    /// The normalised form of the requested path.
    pub full_path: String,
    #[serde(flatten)]
    pub availability: Availability,
}

/// One page flagged by the SEO audit.
#[derive(Debug, Serialize)]
pub struct SeoAuditEntry {
    pub entity_type: String,
    pub entity_id: DbId,
    pub name: String,
    pub full_path: String,
    pub status: String,
    /// Recommended fields that are missing or blank.
    pub missing: Vec<&'static str>,
    /// Set when the stored blob no longer parses.
    pub invalid: Option<String>,
    pub updated_at: Timestamp,
}

/// GET /api/admin/seo/slugs
pub async fn list_slugs(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SlugListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = SlugListFilter {
        status: params.status,
        entity_type: params.entity_type.map(|k| k.to_string()),
        limit: clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let records = SlugRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/admin/seo/slugs/check?path=
pub async fn check_slug(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SlugCheckParams>,
) -> AppResult<impl IntoResponse> {
    let full_path = normalize_path(&params.path)?;
    let requester = match (params.entity_type, params.entity_id) {
        (Some(kind), Some(id)) => Some((kind, id)),
        (None, None) => None,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "entity_type and entity_id must be given together".into(),
            )))
        }
    };

    let availability = registrar::check_availability(&state.pool, &full_path, requester).await?;

    Ok(Json(DataResponse {
        data: SlugCheckResponse {
            full_path,
            availability,
        },
    }))
}

/// GET /api/admin/seo/audit
///
/// Lists non-archived pages missing a meta title or description, or whose
/// stored SEO blob fails validation.
pub async fn audit(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let rows = AnalyticsRepo::seo_audit_rows(&state.pool).await?;

    let entries: Vec<SeoAuditEntry> = rows
        .into_iter()
        .filter_map(|row| {
            let (missing, invalid) = match parse_seo(&row.seo) {
                Ok(seo) => (seo.missing_fields(), None),
                Err(err) => (Vec::new(), Some(err.to_string())),
            };
            if missing.is_empty() && invalid.is_none() {
                return None;
            }
            Some(SeoAuditEntry {
                entity_type: row.entity_type,
                entity_id: row.entity_id,
                name: row.name,
                full_path: row.full_path,
                status: row.status,
                missing,
                invalid,
                updated_at: row.updated_at,
            })
        })
        .collect();

    Ok(Json(DataResponse { data: entries }))
}
