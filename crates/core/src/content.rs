//! Content entity kinds and their field-level rules.
//!
//! Exams, colleges and scholarships share a publication lifecycle and a slug
//! namespace; each has a few range rules of its own.

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::CoreError;

/// Earliest accepted college founding year.
pub const MIN_ESTABLISHED_YEAR: i32 = 1800;

/// Maximum length of an `official_url`.
pub const MAX_URL_LENGTH: usize = 2_048;

crate::define_text_enum! {
    /// Kinds of record that own a public path.
    EntityKind {
        Exam = "exam",
        College = "college",
        Scholarship = "scholarship",
        Campaign = "campaign",
    }
}

impl EntityKind {
    /// Path prefix of the kind's public pages. Campaigns carry their own.
    pub fn path_prefix(self) -> Option<&'static str> {
        match self {
            EntityKind::Exam => Some("exams"),
            EntityKind::College => Some("colleges"),
            EntityKind::Scholarship => Some("scholarships"),
            EntityKind::Campaign => None,
        }
    }

    /// Entity label used in not-found errors.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Exam => "Exam",
            EntityKind::College => "College",
            EntityKind::Scholarship => "Scholarship",
            EntityKind::Campaign => "Campaign",
        }
    }

    /// Whether trackers may be bound to this kind at entity scope.
    pub fn accepts_entity_trackers(self) -> bool {
        self != EntityKind::Campaign
    }
}

/// Validate exam dates: `registration_start <= registration_end <= exam_date`
/// for whichever of the three are present.
pub fn validate_exam_dates(
    registration_start: Option<NaiveDate>,
    registration_end: Option<NaiveDate>,
    exam_date: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (registration_start, registration_end) {
        if start > end {
            return Err(CoreError::Validation(format!(
                "registration_start ({start}) must not be after registration_end ({end})"
            )));
        }
    }
    let last_registration_day = registration_end.or(registration_start);
    if let (Some(reg), Some(exam)) = (last_registration_day, exam_date) {
        if reg > exam {
            return Err(CoreError::Validation(format!(
                "registration window ({reg}) must close on or before exam_date ({exam})"
            )));
        }
    }
    Ok(())
}

/// Validate a scholarship amount range.
pub fn validate_amount_range(
    amount_min: Option<i64>,
    amount_max: Option<i64>,
) -> Result<(), CoreError> {
    for (field, value) in [("amount_min", amount_min), ("amount_max", amount_max)] {
        if let Some(v) = value {
            if v < 0 {
                return Err(CoreError::Validation(format!(
                    "{field} must not be negative (got {v})"
                )));
            }
        }
    }
    if let (Some(min), Some(max)) = (amount_min, amount_max) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "amount_min ({min}) must not exceed amount_max ({max})"
            )));
        }
    }
    Ok(())
}

/// Validate a college's founding year.
pub fn validate_established_year(year: Option<i32>) -> Result<(), CoreError> {
    let Some(year) = year else {
        return Ok(());
    };
    let current = Utc::now().year();
    if !(MIN_ESTABLISHED_YEAR..=current).contains(&year) {
        return Err(CoreError::Validation(format!(
            "established_year must be between {MIN_ESTABLISHED_YEAR} and {current} (got {year})"
        )));
    }
    Ok(())
}

/// Validate an external URL: absolute http(s), bounded length.
pub fn validate_url(field: &str, url: Option<&str>) -> Result<(), CoreError> {
    let Some(url) = url else {
        return Ok(());
    };
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CoreError::Validation(format!(
            "{field} must be an absolute http(s) URL"
        )));
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_URL_LENGTH} characters"
        )));
    }
    Ok(())
}
