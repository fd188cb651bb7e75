//! Slug registry policy: path normalisation, reservation and retirement.
//!
//! Every public page (exam, college, scholarship, campaign) owns one
//! `full_path`. A path belongs to at most one live owner, and a retired path
//! is never handed out again, even after its owner is deleted.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::DbId;

/// Maximum normalised length of a full path.
pub const MAX_PATH_LENGTH: usize = 255;

/// Runs of characters outside `[a-z0-9]`, collapsed to a single `-`.
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

crate::define_text_enum! {
    /// Status of a path reservation.
    SlugStatus {
        Draft = "draft",
        Active = "active",
        Retired = "retired",
    }
}

/// Errors raised by the slug registrar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("Invalid path: {0}")]
    Invalid(String),

    #[error("Path '{full_path}' is already used by {entity_type} '{entity_name}'")]
    Conflict {
        full_path: String,
        entity_type: String,
        entity_name: String,
    },

    #[error("Path '{full_path}' was retired and cannot be reused")]
    RetiredConflict { full_path: String },
}

/// The stored state of a path, as far as the policy needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugHolder {
    pub entity_type: String,
    pub entity_id: DbId,
    pub entity_name: String,
    pub status: SlugStatus,
}

/// Outcome of a reservation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// The path is free; insert a new record.
    New,
    /// The requesting entity already holds the path.
    AlreadyHeld,
}

/// Availability of a path as reported to the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Taken {
        entity_type: String,
        entity_id: DbId,
        entity_name: String,
    },
    Retired,
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Normalise one slug segment the way the admin UI formats slugs.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-` and trims leading/trailing dashes. May return an empty string.
pub fn normalize_slug(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    NON_SLUG_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Normalise a full path: every segment via [`normalize_slug`], empty segments
/// dropped, joined with `/` and a leading `/`.
pub fn normalize_path(raw: &str) -> Result<String, SlugError> {
    let segments: Vec<String> = raw
        .split('/')
        .map(normalize_slug)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        return Err(SlugError::Invalid(format!(
            "'{raw}' contains no usable characters"
        )));
    }

    let path = format!("/{}", segments.join("/"));
    if path.len() > MAX_PATH_LENGTH {
        return Err(SlugError::Invalid(format!(
            "path exceeds maximum length of {MAX_PATH_LENGTH} characters (got {})",
            path.len()
        )));
    }
    Ok(path)
}

/// Build the full path for a slug under a prefix (e.g. `exams`, `ad`).
pub fn full_path(prefix: &str, slug: &str) -> Result<String, SlugError> {
    let slug = normalize_slug(slug);
    if slug.is_empty() {
        return Err(SlugError::Invalid("slug must not be empty".to_string()));
    }
    normalize_path(&format!("{prefix}/{slug}"))
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Decide whether `entity_type`/`entity_id` may reserve `full_path` given the
/// current holder of the path, if any.
pub fn check_reservation(
    full_path: &str,
    holder: Option<&SlugHolder>,
    entity_type: &str,
    entity_id: DbId,
) -> Result<Reservation, SlugError> {
    let Some(holder) = holder else {
        return Ok(Reservation::New);
    };

    if holder.status == SlugStatus::Retired {
        return Err(SlugError::RetiredConflict {
            full_path: full_path.to_string(),
        });
    }

    if holder.entity_type == entity_type && holder.entity_id == entity_id {
        return Ok(Reservation::AlreadyHeld);
    }

    Err(SlugError::Conflict {
        full_path: full_path.to_string(),
        entity_type: holder.entity_type.clone(),
        entity_name: holder.entity_name.clone(),
    })
}

/// Report the availability of a path.
///
/// When `requester` is given, a path held by that same entity counts as
/// available (editing an entity must not flag its own path as taken).
pub fn availability(
    holder: Option<&SlugHolder>,
    requester: Option<(&str, DbId)>,
) -> Availability {
    match holder {
        None => Availability::Available,
        Some(h) if h.status == SlugStatus::Retired => Availability::Retired,
        Some(h) if requester == Some((h.entity_type.as_str(), h.entity_id)) => {
            Availability::Available
        }
        Some(h) => Availability::Taken {
            entity_type: h.entity_type.clone(),
            entity_id: h.entity_id,
            entity_name: h.entity_name.clone(),
        },
    }
}

/// Initial reservation status for an owner in the given publication state.
pub fn initial_status(owner_is_public: bool) -> SlugStatus {
    if owner_is_public {
        SlugStatus::Active
    } else {
        SlugStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn holder(entity_type: &str, entity_id: DbId, status: SlugStatus) -> SlugHolder {
        SlugHolder {
            entity_type: entity_type.to_string(),
            entity_id,
            entity_name: "Summer Admissions".to_string(),
            status,
        }
    }

    // -- normalisation --

    #[test]
    fn slug_normalisation_matches_ui_formatter() {
        assert_eq!(normalize_slug("JEE Main 2025!"), "jee-main-2025");
        assert_eq!(normalize_slug("  --IIT__Delhi--  "), "iit-delhi");
        assert_eq!(normalize_slug("Über Scholarship"), "ber-scholarship");
        assert_eq!(normalize_slug("***"), "");
    }

    #[test]
    fn path_normalisation() {
        assert_eq!(normalize_path("/AD/Test").unwrap(), "/ad/test");
        assert_eq!(normalize_path("ad//Spring Sale/").unwrap(), "/ad/spring-sale");
        assert_matches!(normalize_path("/ / "), Err(SlugError::Invalid(_)));
    }

    #[test]
    fn path_length_limit() {
        let long = "a".repeat(MAX_PATH_LENGTH);
        assert_matches!(normalize_path(&long), Err(SlugError::Invalid(_)));
    }

    #[test]
    fn full_path_joins_prefix() {
        assert_eq!(full_path("exams", "JEE Main").unwrap(), "/exams/jee-main");
        assert_matches!(full_path("exams", "!!"), Err(SlugError::Invalid(_)));
    }

    // -- reservation --

    #[test]
    fn free_path_reserves_new() {
        assert_eq!(
            check_reservation("/ad/test", None, "campaign", 1),
            Ok(Reservation::New)
        );
    }

    #[test]
    fn same_entity_already_holds() {
        let h = holder("campaign", 1, SlugStatus::Draft);
        assert_eq!(
            check_reservation("/ad/test", Some(&h), "campaign", 1),
            Ok(Reservation::AlreadyHeld)
        );
    }

    #[test]
    fn other_entity_conflicts() {
        let h = holder("campaign", 1, SlugStatus::Active);
        let err = check_reservation("/ad/test", Some(&h), "campaign", 2).unwrap_err();
        assert_eq!(
            err,
            SlugError::Conflict {
                full_path: "/ad/test".into(),
                entity_type: "campaign".into(),
                entity_name: "Summer Admissions".into(),
            }
        );
    }

    #[test]
    fn same_id_different_type_conflicts() {
        let h = holder("exam", 1, SlugStatus::Draft);
        assert_matches!(
            check_reservation("/ad/test", Some(&h), "college", 1),
            Err(SlugError::Conflict { .. })
        );
    }

    #[test]
    fn retired_path_never_reissued() {
        let h = holder("campaign", 1, SlugStatus::Retired);
        // Not even to its former owner.
        for (t, id) in [("campaign", 1), ("campaign", 2), ("exam", 9)] {
            assert_matches!(
                check_reservation("/ad/test", Some(&h), t, id),
                Err(SlugError::RetiredConflict { .. })
            );
        }
    }

    // -- availability --

    #[test]
    fn availability_states() {
        assert_eq!(availability(None, None), Availability::Available);

        let retired = holder("exam", 3, SlugStatus::Retired);
        assert_eq!(availability(Some(&retired), None), Availability::Retired);

        let active = holder("exam", 3, SlugStatus::Active);
        assert_matches!(
            availability(Some(&active), None),
            Availability::Taken { entity_id: 3, .. }
        );
        assert_eq!(
            availability(Some(&active), Some(("exam", 3))),
            Availability::Available
        );
    }

    #[test]
    fn initial_status_follows_owner() {
        assert_eq!(initial_status(true), SlugStatus::Active);
        assert_eq!(initial_status(false), SlugStatus::Draft);
    }
}
