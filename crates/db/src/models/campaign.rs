//! Campaign (landing page) model and DTOs.

use pagedesk_core::content::EntityKind;
use pagedesk_core::lifecycle::{CampaignRefs, PublicationStatus};
use pagedesk_core::trackers::{LoadPosition, TrackerOverride};
use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub url_prefix: String,
    pub full_path: String,
    #[sqlx(try_from = "String")]
    pub status: PublicationStatus,
    pub template_id: Option<DbId>,
    pub template_version: Option<i32>,
    pub form_schema_id: Option<DbId>,
    pub form_schema_version: Option<i32>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub content: serde_json::Value,
    pub seo: serde_json::Value,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Campaign {
    /// The template/form references this campaign pins.
    pub fn refs(&self) -> CampaignRefs {
        CampaignRefs {
            template_id: self.template_id,
            template_version: self.template_version,
            form_schema_id: self.form_schema_id,
        }
    }

    /// The linked entity, if any.
    pub fn entity(&self) -> Option<(EntityKind, DbId)> {
        let kind = self.entity_type.as_deref().and_then(EntityKind::parse)?;
        Some((kind, self.entity_id?))
    }
}

/// DTO for creating a new campaign. The slug defaults to the name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub url_prefix: String,
    pub template_id: Option<DbId>,
    pub template_version: Option<i32>,
    pub form_schema_id: Option<DbId>,
    pub entity_type: Option<EntityKind>,
    pub entity_id: Option<DbId>,
    pub content: Option<serde_json::Value>,
    pub seo: Option<serde_json::Value>,
}

/// DTO for updating a campaign. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub url_prefix: Option<String>,
    pub template_id: Option<DbId>,
    pub template_version: Option<i32>,
    pub form_schema_id: Option<DbId>,
    pub content: Option<serde_json::Value>,
    pub seo: Option<serde_json::Value>,
}

impl UpdateCampaign {
    /// The reference fields present in this request.
    pub fn requested_refs(&self) -> CampaignRefs {
        CampaignRefs {
            template_id: self.template_id,
            template_version: self.template_version,
            form_schema_id: self.form_schema_id,
        }
    }
}

/// Resolved template/form references written on create or update.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignAssetRefs {
    pub template_id: Option<DbId>,
    pub template_version: Option<i32>,
    pub form_schema_id: Option<DbId>,
    pub form_schema_version: Option<i32>,
}

/// A row from `campaign_trackers` joined with its tracker.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignTracker {
    pub campaign_id: DbId,
    pub tracker_id: DbId,
    pub enabled: bool,
    pub priority: i32,
    pub sort_order: i32,
    pub tracker_name: String,
    pub provider: String,
    #[sqlx(try_from = "String")]
    pub load_position: LoadPosition,
}

impl CampaignTracker {
    pub fn to_override(&self) -> TrackerOverride {
        TrackerOverride {
            tracker_id: self.tracker_id,
            enabled: self.enabled,
            priority: self.priority,
            load_position: self.load_position,
        }
    }
}

/// One entry of a `PUT /campaigns/{id}/trackers` request.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerOverrideInput {
    pub tracker_id: DbId,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Defaults to the tracker's own priority.
    pub priority: Option<i32>,
}

fn default_enabled() -> bool {
    true
}

/// Request body for replacing a campaign's tracker overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceCampaignTrackers {
    pub trackers: Vec<TrackerOverrideInput>,
}
