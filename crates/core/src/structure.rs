//! Minimal shape checks for the opaque structure blobs carried by versioned
//! assets.
//!
//! Template sections and form fields are defined by the admin UI and
//! versioned independently of the backend. The backend only guarantees the
//! outer shape: either `{"sections": [..]}` / `{"fields": [..]}` or a bare
//! array, where every element is a JSON object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Maximum number of sections/fields a single structure may hold.
pub const MAX_STRUCTURE_ELEMENTS: usize = 500;

crate::define_text_enum! {
    /// The two kinds of versioned asset.
    AssetKind {
        Template = "template",
        FormSchema = "form_schema",
    }
}

impl AssetKind {
    /// The key under which the element array lives.
    pub fn element_key(self) -> &'static str {
        match self {
            AssetKind::Template => "sections",
            AssetKind::FormSchema => "fields",
        }
    }

    /// Human-readable entity label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Template => "Template",
            AssetKind::FormSchema => "FormSchema",
        }
    }
}

/// Summary of a validated structure, returned alongside assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub element_count: usize,
}

/// Return the element array of a structure, if the outer shape is valid.
fn elements(kind: AssetKind, structure: &Value) -> Option<&Vec<Value>> {
    match structure {
        Value::Array(items) => Some(items),
        Value::Object(map) => match map.get(kind.element_key()) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Validate the outer shape of a structure.
///
/// An empty element array is accepted here; drafts may be saved empty. The
/// non-empty requirement is enforced at publish time.
pub fn validate_shape(kind: AssetKind, structure: &Value) -> Result<(), CoreError> {
    let key = kind.element_key();
    let items = elements(kind, structure).ok_or_else(|| {
        CoreError::Validation(format!(
            "{} structure must be an array or an object with a '{key}' array",
            kind.label()
        ))
    })?;

    if items.len() > MAX_STRUCTURE_ELEMENTS {
        return Err(CoreError::Validation(format!(
            "{} structure exceeds maximum of {MAX_STRUCTURE_ELEMENTS} {key} (got {})",
            kind.label(),
            items.len()
        )));
    }

    if let Some(pos) = items.iter().position(|item| !item.is_object()) {
        return Err(CoreError::Validation(format!(
            "{} structure element {} in '{key}' must be an object",
            kind.label(),
            pos + 1
        )));
    }
    Ok(())
}

/// Count the meaningful elements (JSON objects) in a structure.
///
/// Malformed structures count as zero.
pub fn count_elements(kind: AssetKind, structure: &Value) -> usize {
    elements(kind, structure)
        .map(|items| items.iter().filter(|item| item.is_object()).count())
        .unwrap_or(0)
}

/// Build a [`StructureSummary`] for a structure.
pub fn summarize(kind: AssetKind, structure: &Value) -> StructureSummary {
    StructureSummary {
        element_count: count_elements(kind, structure),
    }
}
