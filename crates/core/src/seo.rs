//! SEO metadata carried by every public page.
//!
//! Stored as a JSONB `seo` column; validated here at the edge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Recommended maximum length of a meta title.
pub const MAX_META_TITLE_LENGTH: usize = 70;

/// Recommended maximum length of a meta description.
pub const MAX_META_DESCRIPTION_LENGTH: usize = 170;

/// Maximum number of meta keywords.
pub const MAX_KEYWORDS: usize = 20;

/// Robots directives for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlPolicy {
    #[serde(default = "default_true")]
    pub index: bool,
    #[serde(default = "default_true")]
    pub follow: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self {
            index: true,
            follow: true,
        }
    }
}

impl CrawlPolicy {
    /// Render as a `robots` meta tag value.
    pub fn robots(&self) -> String {
        let index = if self.index { "index" } else { "noindex" };
        let follow = if self.follow { "follow" } else { "nofollow" };
        format!("{index},{follow}")
    }
}

/// Page-level SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeoMetadata {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical_url: Option<String>,
    pub og_image: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub crawl: CrawlPolicy,
}

impl SeoMetadata {
    /// Names of recommended fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.meta_title) {
            missing.push("meta_title");
        }
        if blank(&self.meta_description) {
            missing.push("meta_description");
        }
        missing
    }
}

/// Parse and validate an SEO JSON blob. `null` yields the defaults.
pub fn parse_seo(value: &Value) -> Result<SeoMetadata, CoreError> {
    if value.is_null() {
        return Ok(SeoMetadata::default());
    }
    let seo: SeoMetadata = serde_json::from_value(value.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid SEO metadata: {e}")))?;
    validate_seo(&seo)?;
    Ok(seo)
}

/// Validate SEO field lengths and URL shapes.
pub fn validate_seo(seo: &SeoMetadata) -> Result<(), CoreError> {
    if let Some(title) = &seo.meta_title {
        if title.chars().count() > MAX_META_TITLE_LENGTH {
            return Err(CoreError::Validation(format!(
                "meta_title exceeds {MAX_META_TITLE_LENGTH} characters"
            )));
        }
    }
    if let Some(desc) = &seo.meta_description {
        if desc.chars().count() > MAX_META_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "meta_description exceeds {MAX_META_DESCRIPTION_LENGTH} characters"
            )));
        }
    }
    if let Some(url) = &seo.canonical_url {
        if !(url.starts_with('/') || url.starts_with("https://") || url.starts_with("http://")) {
            return Err(CoreError::Validation(
                "canonical_url must be a site path or an absolute http(s) URL".to_string(),
            ));
        }
    }
    if seo.keywords.len() > MAX_KEYWORDS {
        return Err(CoreError::Validation(format!(
            "keywords exceed maximum of {MAX_KEYWORDS} (got {})",
            seo.keywords.len()
        )));
    }
    Ok(())
}

/// Parse-and-normalise an SEO blob, returning the canonical JSON to store.
pub fn normalize_seo(value: &Value) -> Result<Value, CoreError> {
    let seo = parse_seo(value)?;
    serde_json::to_value(seo).map_err(|e| CoreError::Internal(e.to_string()))
}
