//! Tracker resolution: which tracking snippets a page injects, and in what
//! order.
//!
//! Trackers come from three scopes. Global trackers apply to every page,
//! entity trackers to pages about one exam/college/scholarship, and campaign
//! overrides shadow either for a single campaign. [`resolve`] is the only
//! place the resolution chain is implemented.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a tracker snippet in bytes.
pub const MAX_TRACKER_CODE_LENGTH: usize = 20_000;

/// Allowed priority range for trackers and overrides.
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i32> = -1000..=1000;

crate::define_text_enum! {
    /// Where a tracker is attached.
    TrackerScope {
        Global = "global",
        Entity = "entity",
        Campaign = "campaign",
    }
}

crate::define_text_enum! {
    /// Where in the page a tracker snippet is injected.
    LoadPosition {
        Head = "head",
        BodyStart = "body_start",
        BodyEnd = "body_end",
    }
}

impl TrackerScope {
    /// Higher is more specific.
    pub fn specificity(self) -> u8 {
        match self {
            TrackerScope::Global => 0,
            TrackerScope::Entity => 1,
            TrackerScope::Campaign => 2,
        }
    }
}

/// The resolution-relevant view of a stored tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerRef {
    pub id: DbId,
    pub priority: i32,
    pub is_active: bool,
    pub load_position: LoadPosition,
}

/// A campaign's override of one tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerOverride {
    pub tracker_id: DbId,
    pub enabled: bool,
    pub priority: i32,
    /// Load position of the overridden tracker (overrides never move a
    /// tracker, they only re-prioritise or disable it).
    pub load_position: LoadPosition,
}

/// One entry of the resolved injection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedTracker {
    pub tracker_id: DbId,
    /// The scope whose settings won.
    pub scope: TrackerScope,
    pub priority: i32,
    pub load_position: LoadPosition,
}

/// Resolve the ordered, de-duplicated list of trackers for a page.
///
/// 1. Active global trackers.
/// 2. Active trackers of the page's entity.
/// 3. Campaign overrides: enabled ones insert or replace (with the override's
///    priority); disabled ones remove the tracker outright.
/// 4. One entry per tracker id; the most specific scope wins.
/// 5. Ordered by priority descending, then scope specificity descending, then
///    tracker id ascending.
pub fn resolve(
    global: &[TrackerRef],
    entity: &[TrackerRef],
    overrides: &[TrackerOverride],
) -> Vec<ResolvedTracker> {
    let mut winners: HashMap<DbId, ResolvedTracker> = HashMap::new();

    let scoped = global
        .iter()
        .map(|t| (TrackerScope::Global, t))
        .chain(entity.iter().map(|t| (TrackerScope::Entity, t)));

    for (scope, tracker) in scoped.filter(|(_, t)| t.is_active) {
        let candidate = ResolvedTracker {
            tracker_id: tracker.id,
            scope,
            priority: tracker.priority,
            load_position: tracker.load_position,
        };
        winners
            .entry(tracker.id)
            .and_modify(|existing| {
                if scope.specificity() >= existing.scope.specificity() {
                    *existing = candidate;
                }
            })
            .or_insert(candidate);
    }

    for ov in overrides {
        if ov.enabled {
            winners.insert(
                ov.tracker_id,
                ResolvedTracker {
                    tracker_id: ov.tracker_id,
                    scope: TrackerScope::Campaign,
                    priority: ov.priority,
                    load_position: ov.load_position,
                },
            );
        } else {
            winners.remove(&ov.tracker_id);
        }
    }

    let mut resolved: Vec<ResolvedTracker> = winners.into_values().collect();
    resolved.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.scope.specificity().cmp(&a.scope.specificity()))
            .then_with(|| a.tracker_id.cmp(&b.tracker_id))
    });
    resolved
}

/// Resolved trackers bucketed by load position, each bucket in resolution
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionPlan<T> {
    pub head: Vec<T>,
    pub body_start: Vec<T>,
    pub body_end: Vec<T>,
}

impl<T> InjectionPlan<T> {
    /// Bucket an already ordered sequence by load position.
    pub fn bucket<I, F>(items: I, position_of: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> LoadPosition,
    {
        let mut plan = InjectionPlan {
            head: Vec::new(),
            body_start: Vec::new(),
            body_end: Vec::new(),
        };
        for item in items {
            match position_of(&item) {
                LoadPosition::Head => plan.head.push(item),
                LoadPosition::BodyStart => plan.body_start.push(item),
                LoadPosition::BodyEnd => plan.body_end.push(item),
            }
        }
        plan
    }

    /// Total number of trackers across all buckets.
    pub fn len(&self) -> usize {
        self.head.len() + self.body_start.len() + self.body_end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a tracker priority.
pub fn validate_priority(priority: i32) -> Result<(), CoreError> {
    if !PRIORITY_RANGE.contains(&priority) {
        return Err(CoreError::Validation(format!(
            "Priority must be between {} and {} (got {priority})",
            PRIORITY_RANGE.start(),
            PRIORITY_RANGE.end()
        )));
    }
    Ok(())
}

/// Validate a tracker snippet.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.trim().is_empty() {
        return Err(CoreError::Validation(
            "Tracker code must not be empty".to_string(),
        ));
    }
    if code.len() > MAX_TRACKER_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tracker code exceeds maximum length of {MAX_TRACKER_CODE_LENGTH} bytes (got {})",
            code.len()
        )));
    }
    Ok(())
}

/// Validate that a tracker's entity binding matches its scope.
///
/// Entity-scoped trackers must name both an entity type and id; other scopes
/// must name neither.
pub fn validate_binding(
    scope: TrackerScope,
    entity_type: Option<&str>,
    entity_id: Option<DbId>,
) -> Result<(), CoreError> {
    match (scope, entity_type, entity_id) {
        (TrackerScope::Entity, Some(_), Some(_)) => Ok(()),
        (TrackerScope::Entity, _, _) => Err(CoreError::Validation(
            "Entity-scoped trackers require entity_type and entity_id".to_string(),
        )),
        (_, None, None) => Ok(()),
        (scope, _, _) => Err(CoreError::Validation(format!(
            "{scope} trackers must not set entity_type or entity_id"
        ))),
    }
}

/// Reject override lists naming the same tracker twice.
pub fn validate_override_ids(ids: &[DbId]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Tracker {id} is listed more than once"
            )));
        }
    }
    Ok(())
}
