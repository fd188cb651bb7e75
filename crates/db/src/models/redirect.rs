//! Redirect model and DTOs.

use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `redirects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Redirect {
    pub id: DbId,
    pub source_path: String,
    pub target_path: String,
    pub redirect_type: i16,
    pub is_active: bool,
    pub hit_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a redirect. `redirect_type` defaults to 301.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRedirect {
    pub source_path: String,
    pub target_path: String,
    pub redirect_type: Option<i16>,
    pub is_active: Option<bool>,
}

/// DTO for updating a redirect. The source path is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRedirect {
    pub target_path: Option<String>,
    pub redirect_type: Option<i16>,
    pub is_active: Option<bool>,
}
