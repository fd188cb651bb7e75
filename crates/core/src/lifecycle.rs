//! Version lifecycle and publication state machines.
//!
//! Two related machines live here:
//!
//! - [`AssetStatus`] governs versioned assets (templates and form schemas):
//!   `draft -> published -> retired`. A published version's structure is
//!   frozen; edits go into a new draft version.
//! - [`PublicationStatus`] governs campaigns and content entities:
//!   `draft -> live -> closed`, with `archived` reachable from anywhere and
//!   terminal. A campaign's template and form schema references lock the first
//!   time it leaves `draft`.

use serde::Serialize;
use serde_json::Value;

use crate::structure::{count_elements, AssetKind};
use crate::types::DbId;

crate::define_text_enum! {
    /// Lifecycle status of a template or form schema version.
    AssetStatus {
        Draft = "draft",
        Published = "published",
        Retired = "retired",
    }
}

crate::define_text_enum! {
    /// Lifecycle status of a campaign, exam, college or scholarship.
    PublicationStatus {
        Draft = "draft",
        Live = "live",
        Closed = "closed",
        Archived = "archived",
    }
}

/// Errors raised by the lifecycle policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("This version is already published; create a new version to make changes")]
    AlreadyPublished,

    #[error("Cannot publish an empty structure; add at least one element first")]
    EmptyStructure,

    #[error("Draft version {draft_version} already exists; publish or discard it first")]
    VersionConflict { draft_version: i32 },

    #[error("A {status} version is read-only; create a new version to make changes")]
    ReadOnly { status: AssetStatus },

    #[error("Cannot move from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("'{field}' is locked once a campaign has gone live")]
    LockedReference { field: &'static str },

    #[error("{kind} version {version} must be published before going live")]
    UnpublishedReference { kind: &'static str, version: i32 },
}

// ---------------------------------------------------------------------------
// Versioned assets
// ---------------------------------------------------------------------------

/// Whether a version's content may still be edited in place.
pub fn can_edit(status: AssetStatus) -> bool {
    status == AssetStatus::Draft
}

/// Reject in-place edits of a non-draft version.
pub fn ensure_editable(status: AssetStatus) -> Result<(), LifecycleError> {
    if can_edit(status) {
        Ok(())
    } else {
        Err(LifecycleError::ReadOnly { status })
    }
}

/// Decide whether a version may be published.
///
/// Returns the new status on success. Publishing is irreversible within a
/// version.
pub fn publish(
    kind: AssetKind,
    status: AssetStatus,
    structure: &Value,
) -> Result<AssetStatus, LifecycleError> {
    if status != AssetStatus::Draft {
        return Err(LifecycleError::AlreadyPublished);
    }
    if count_elements(kind, structure) == 0 {
        return Err(LifecycleError::EmptyStructure);
    }
    Ok(AssetStatus::Published)
}

/// Decide whether a version may be retired. Only published versions retire.
pub fn retire(status: AssetStatus) -> Result<AssetStatus, LifecycleError> {
    match status {
        AssetStatus::Published => Ok(AssetStatus::Retired),
        other => Err(LifecycleError::InvalidTransition {
            from: other.to_string(),
            to: AssetStatus::Retired.to_string(),
        }),
    }
}

/// Only drafts may be discarded; published and retired versions stay on
/// record because campaigns may pin them.
pub fn can_discard(status: AssetStatus) -> bool {
    status == AssetStatus::Draft
}

/// Version number and status of one existing version of a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    pub version: i32,
    pub status: AssetStatus,
}

/// Compute the version number for a new draft of a slug.
///
/// With no existing versions the first version is `1`. Otherwise a new draft
/// is only allowed when no draft exists; the new number is `max + 1`.
pub fn plan_new_version(existing: &[VersionSummary]) -> Result<i32, LifecycleError> {
    if let Some(draft) = existing.iter().find(|v| v.status == AssetStatus::Draft) {
        return Err(LifecycleError::VersionConflict {
            draft_version: draft.version,
        });
    }
    let latest = existing.iter().map(|v| v.version).max().unwrap_or(0);
    Ok(latest + 1)
}

/// Versions superseded when `publishing` is published.
///
/// Every other published version of the same slug is retired so only one
/// published version remains current.
pub fn superseded_versions(existing: &[VersionSummary], publishing: i32) -> Vec<i32> {
    let mut versions: Vec<i32> = existing
        .iter()
        .filter(|v| v.status == AssetStatus::Published && v.version != publishing)
        .map(|v| v.version)
        .collect();
    versions.sort_unstable();
    versions
}

// ---------------------------------------------------------------------------
// Publication status (campaigns, exams, colleges, scholarships)
// ---------------------------------------------------------------------------

impl PublicationStatus {
    /// Whether a direct transition to `next` is allowed.
    pub fn can_transition_to(self, next: PublicationStatus) -> bool {
        use PublicationStatus::*;
        matches!(
            (self, next),
            (Draft, Live) | (Draft, Archived) | (Live, Closed) | (Live, Archived)
                | (Closed, Live) | (Closed, Archived)
        )
    }

    /// Whether the record is publicly reachable.
    pub fn is_public(self) -> bool {
        self == PublicationStatus::Live
    }
}

/// Validate a publication status transition.
pub fn transition(
    from: PublicationStatus,
    to: PublicationStatus,
) -> Result<PublicationStatus, LifecycleError> {
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(LifecycleError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// The template and form schema references a campaign pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CampaignRefs {
    pub template_id: Option<DbId>,
    pub template_version: Option<i32>,
    pub form_schema_id: Option<DbId>,
}

/// References lock once a campaign has left draft.
pub fn refs_locked(status: PublicationStatus) -> bool {
    status != PublicationStatus::Draft
}

/// Reject any change to a locked campaign's references.
///
/// `requested` holds only the fields present in the update request; absent
/// fields are `None` and never count as a change.
pub fn check_reference_change(
    status: PublicationStatus,
    current: &CampaignRefs,
    requested: &CampaignRefs,
) -> Result<(), LifecycleError> {
    if !refs_locked(status) {
        return Ok(());
    }
    if requested.template_id.is_some() && requested.template_id != current.template_id {
        return Err(LifecycleError::LockedReference {
            field: "template_id",
        });
    }
    if requested.template_version.is_some()
        && requested.template_version != current.template_version
    {
        return Err(LifecycleError::LockedReference {
            field: "template_version",
        });
    }
    if requested.form_schema_id.is_some() && requested.form_schema_id != current.form_schema_id {
        return Err(LifecycleError::LockedReference {
            field: "form_schema_id",
        });
    }
    Ok(())
}

/// Check that a referenced asset version can back a live campaign.
pub fn ensure_live_reference(
    kind: AssetKind,
    version: i32,
    status: AssetStatus,
) -> Result<(), LifecycleError> {
    match status {
        AssetStatus::Published => Ok(()),
        _ => Err(LifecycleError::UnpublishedReference {
            kind: kind.label(),
            version,
        }),
    }
}
