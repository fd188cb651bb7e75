//! Versioned asset model and DTOs (templates and form schemas).
//!
//! Both tables share one column layout; [`pagedesk_core::structure::AssetKind`]
//! selects the table.

use pagedesk_core::lifecycle::{AssetStatus, VersionSummary};
use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `templates` or `form_schemas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionedAsset {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub version: i32,
    #[sqlx(try_from = "String")]
    pub status: AssetStatus,
    pub structure: serde_json::Value,
    pub usage_count: i32,
    pub created_by: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VersionedAsset {
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            version: self.version,
            status: self.status,
        }
    }
}

/// DTO for creating version 1 of a new asset. The slug defaults to the name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVersionedAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub structure: Option<serde_json::Value>,
}

/// DTO for editing a draft version. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVersionedAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub structure: Option<serde_json::Value>,
}
