//! Aggregate rows for the analytics dashboard and SEO audit.

use pagedesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Number of records of one resource in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub resource: String,
    pub status: String,
    pub count: i64,
}

/// Tracker totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackerTotals {
    pub total: i64,
    pub active: i64,
}

/// Redirect totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RedirectTotals {
    pub total: i64,
    pub active: i64,
    pub hits: i64,
}

/// A public page with its stored SEO blob, for auditing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeoAuditRow {
    pub entity_type: String,
    pub entity_id: DbId,
    pub name: String,
    pub full_path: String,
    pub status: String,
    pub seo: serde_json::Value,
    pub updated_at: Timestamp,
}
