//! Slug registry model.

use pagedesk_core::slugs::{SlugHolder, SlugStatus};
use pagedesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `slug_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlugRecord {
    pub id: DbId,
    pub full_path: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub entity_name: String,
    #[sqlx(try_from = "String")]
    pub status: SlugStatus,
    pub retired_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SlugRecord {
    /// The policy view of this record.
    pub fn holder(&self) -> SlugHolder {
        SlugHolder {
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id,
            entity_name: self.entity_name.clone(),
            status: self.status,
        }
    }
}

/// Insert payload for a new reservation.
#[derive(Debug, Clone)]
pub struct CreateSlugRecord {
    pub full_path: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub entity_name: String,
    pub status: SlugStatus,
}

/// Filter for listing slug records.
#[derive(Debug, Clone, Default)]
pub struct SlugListFilter {
    pub status: Option<SlugStatus>,
    pub entity_type: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
