//! Helpers shared by the exam, college, scholarship and campaign handlers:
//! slug/path derivation, SEO normalisation, status requests and bulk import.

use std::future::Future;

use pagedesk_core::content::EntityKind;
use pagedesk_core::error::CoreError;
use pagedesk_core::import::{validate_columns, validate_row_count, ImportSummary};
use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::seo::normalize_seo;
use pagedesk_core::slugs::{self, normalize_slug};
use pagedesk_core::types::DbId;
use pagedesk_db::repositories::{CampaignRepo, CollegeRepo, ExamRepo, ScholarshipRepo};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Request body for `POST /{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: PublicationStatus,
}

/// Request body for `POST /import`.
///
/// `columns` declares the fields present in the upload; each row is an
/// object keyed by those column names. Keys outside `columns` are ignored.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub columns: Vec<String>,
    pub rows: Vec<Value>,
}

/// Normalise the requested slug, falling back to the record's name.
pub fn resolve_slug(requested: Option<&str>, name: &str) -> AppResult<String> {
    let slug = normalize_slug(requested.unwrap_or(name));
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "slug must contain at least one letter or digit".into(),
        )));
    }
    Ok(slug)
}

/// The public path of a content entity with the given slug.
pub fn entity_path(kind: EntityKind, slug: &str) -> AppResult<String> {
    let prefix = kind.path_prefix().ok_or_else(|| {
        AppError::InternalError(format!("{} has no fixed path prefix", kind.label()))
    })?;
    Ok(slugs::full_path(prefix, slug)?)
}

/// Validate and canonicalise an optional SEO blob.
pub fn normalize_seo_input(seo: Option<&Value>) -> AppResult<Option<Value>> {
    Ok(seo.map(normalize_seo).transpose()?)
}

/// Fail with 404 unless the referenced entity exists.
pub async fn ensure_entity_exists<'e, E: sqlx::PgExecutor<'e>>(
    db: E,
    kind: EntityKind,
    id: DbId,
) -> AppResult<()> {
    let exists = match kind {
        EntityKind::Exam => ExamRepo::exists(db, id).await?,
        EntityKind::College => CollegeRepo::exists(db, id).await?,
        EntityKind::Scholarship => ScholarshipRepo::exists(db, id).await?,
        EntityKind::Campaign => CampaignRepo::find_by_id(db, id).await?.is_some(),
    };
    if !exists {
        return Err(AppError::Core(CoreError::NotFound {
            entity: kind.label(),
            id,
        }));
    }
    Ok(())
}

/// Replay import rows one by one through `insert`.
///
/// Column and row-count problems reject the whole request before any write.
/// After that every row is independent: a failing row is recorded with its
/// 1-based number and the import moves on.
pub async fn run_import<T, F, Fut>(
    input: ImportRequest,
    required: &[&str],
    mut insert: F,
) -> AppResult<ImportSummary>
where
    T: DeserializeOwned,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    validate_columns(&input.columns, required)?;
    validate_row_count(input.rows.len())?;

    let mut summary = ImportSummary::default();
    for (index, row) in input.rows.into_iter().enumerate() {
        let outcome = match project_row(row, &input.columns) {
            Ok(item) => insert(item).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => summary.record_success(),
            Err(err) => {
                let (_, _, message) = err.parts();
                summary.record_failure(index + 1, message);
            }
        }
    }
    Ok(summary)
}

/// Keep only the declared columns of a row and deserialise it.
fn project_row<T: DeserializeOwned>(row: Value, columns: &[String]) -> AppResult<T> {
    let Value::Object(mut fields) = row else {
        return Err(AppError::BadRequest("Row must be an object".into()));
    };
    fields.retain(|key, _| columns.iter().any(|c| c == key));
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::BadRequest(format!("Invalid row: {e}")))
}
