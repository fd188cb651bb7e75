//! Repository for the `slug_records` registry.

use pagedesk_core::slugs::SlugStatus;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::slug_record::{CreateSlugRecord, SlugListFilter, SlugRecord};

/// Column list for slug record queries.
const COLUMNS: &str = "id, full_path, entity_type, entity_id, entity_name, status, \
    retired_at, created_at, updated_at";

/// Provides storage for path reservations. Policy lives in
/// `pagedesk_core::slugs`; this repo only reads and writes rows.
pub struct SlugRepo;

impl SlugRepo {
    /// Insert a new reservation. A taken path violates `uq_slug_records_full_path`.
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateSlugRecord,
    ) -> Result<SlugRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO slug_records (full_path, entity_type, entity_id, entity_name, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SlugRecord>(&query)
            .bind(&input.full_path)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.entity_name)
            .bind(input.status.as_str())
            .fetch_one(db)
            .await
    }

    /// Find the record for a normalised path and lock it for the transaction.
    pub async fn find_by_path_for_update<'e, E: PgExecutor<'e>>(
        db: E,
        full_path: &str,
    ) -> Result<Option<SlugRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slug_records WHERE full_path = $1 FOR UPDATE");
        sqlx::query_as::<_, SlugRecord>(&query)
            .bind(full_path)
            .fetch_optional(db)
            .await
    }

    /// Find the record for a normalised path.
    pub async fn find_by_path<'e, E: PgExecutor<'e>>(
        db: E,
        full_path: &str,
    ) -> Result<Option<SlugRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slug_records WHERE full_path = $1");
        sqlx::query_as::<_, SlugRecord>(&query)
            .bind(full_path)
            .fetch_optional(db)
            .await
    }

    /// List records, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        filter: &SlugListFilter,
    ) -> Result<Vec<SlugRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slug_records
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR entity_type = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, SlugRecord>(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(&filter.entity_type)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(db)
            .await
    }

    /// Set the status of a non-retired record. Retiring stamps `retired_at`.
    ///
    /// Returns `None` when the path is unknown or already retired.
    pub async fn set_status<'e, E: PgExecutor<'e>>(
        db: E,
        full_path: &str,
        status: SlugStatus,
    ) -> Result<Option<SlugRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE slug_records SET
                status = $2,
                retired_at = CASE WHEN $2 = 'retired' THEN NOW() ELSE retired_at END
             WHERE full_path = $1 AND status <> 'retired'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SlugRecord>(&query)
            .bind(full_path)
            .bind(status.as_str())
            .fetch_optional(db)
            .await
    }

    /// Keep the owner's display name current on its live reservations.
    pub async fn rename_owner<'e, E: PgExecutor<'e>>(
        db: E,
        entity_type: &str,
        entity_id: DbId,
        entity_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE slug_records SET entity_name = $3
             WHERE entity_type = $1 AND entity_id = $2 AND status <> 'retired'",
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(entity_name)
        .execute(db)
        .await?;
        Ok(())
    }
}
