//! Shared query parameter types for API handlers.

use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use pagedesk_db::models::filter::ContentListFilter;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)`.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// List parameters for campaigns and content entities
/// (`?status=&search=&limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct ContentListParams {
    pub status: Option<PublicationStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ContentListParams> for ContentListFilter {
    fn from(params: ContentListParams) -> Self {
        ContentListFilter {
            status: params.status,
            search: params.search,
            limit: clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
            offset: clamp_offset(params.offset),
        }
    }
}
