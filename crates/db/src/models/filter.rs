//! Shared list filters.

use pagedesk_core::lifecycle::PublicationStatus;

/// Filter for listing campaigns and content entities.
#[derive(Debug, Clone, Default)]
pub struct ContentListFilter {
    pub status: Option<PublicationStatus>,
    /// Case-insensitive substring matched against name and slug.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ContentListFilter {
    /// The `ILIKE` pattern for [`Self::search`], if any.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(pagedesk_core::search::contains_pattern)
    }

    /// The status filter as stored TEXT.
    pub fn status_text(&self) -> Option<&'static str> {
        self.status.map(|s| s.as_str())
    }
}
