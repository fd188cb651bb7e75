//! Tracker model and DTOs.

use pagedesk_core::content::EntityKind;
use pagedesk_core::trackers::{LoadPosition, TrackerRef, TrackerScope};
use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `trackers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tracker {
    pub id: DbId,
    pub name: String,
    pub provider: String,
    #[sqlx(try_from = "String")]
    pub scope: TrackerScope,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub load_position: LoadPosition,
    pub code: String,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tracker {
    /// The resolution-relevant view of this tracker.
    pub fn as_ref(&self) -> TrackerRef {
        TrackerRef {
            id: self.id,
            priority: self.priority,
            is_active: self.is_active,
            load_position: self.load_position,
        }
    }
}

/// DTO for creating a tracker. Scope and entity binding are fixed at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTracker {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub provider: Option<String>,
    pub scope: TrackerScope,
    pub entity_type: Option<EntityKind>,
    pub entity_id: Option<DbId>,
    pub load_position: Option<LoadPosition>,
    pub code: String,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a tracker. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTracker {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub provider: Option<String>,
    pub load_position: Option<LoadPosition>,
    pub code: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// Filter for listing trackers.
#[derive(Debug, Clone, Default)]
pub struct TrackerListFilter {
    pub scope: Option<TrackerScope>,
    pub entity_type: Option<EntityKind>,
    pub entity_id: Option<DbId>,
    pub include_inactive: bool,
}
