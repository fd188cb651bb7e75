//! Repository for the `trackers` table.

use pagedesk_core::trackers::{LoadPosition, TrackerScope};
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::tracker::{CreateTracker, Tracker, TrackerListFilter, UpdateTracker};

/// Column list for tracker queries.
const COLUMNS: &str = "id, name, provider, scope, entity_type, entity_id, load_position, \
    code, priority, is_active, created_at, updated_at";

/// Provides CRUD and resolution lookups for trackers.
pub struct TrackerRepo;

impl TrackerRepo {
    /// Insert a new tracker. Missing optional fields fall back to the
    /// column defaults (`custom`, `head`, priority 0, active).
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateTracker,
    ) -> Result<Tracker, sqlx::Error> {
        let query = format!(
            "INSERT INTO trackers
                (name, provider, scope, entity_type, entity_id, load_position, code, priority, is_active)
             VALUES ($1, COALESCE($2, 'custom'), $3, $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tracker>(&query)
            .bind(&input.name)
            .bind(&input.provider)
            .bind(input.scope.as_str())
            .bind(input.entity_type.map(|k| k.as_str()))
            .bind(input.entity_id)
            .bind(input.load_position.unwrap_or(LoadPosition::Head).as_str())
            .bind(&input.code)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_one(db)
            .await
    }

    /// Find a tracker by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Tracker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trackers WHERE id = $1");
        sqlx::query_as::<_, Tracker>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// List trackers, highest priority first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        filter: &TrackerListFilter,
    ) -> Result<Vec<Tracker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trackers
             WHERE ($1::text IS NULL OR scope = $1)
               AND ($2::text IS NULL OR entity_type = $2)
               AND ($3::bigint IS NULL OR entity_id = $3)
               AND ($4 OR is_active)
             ORDER BY priority DESC, id ASC"
        );
        sqlx::query_as::<_, Tracker>(&query)
            .bind(filter.scope.map(|s| s.as_str()))
            .bind(filter.entity_type.map(|k| k.as_str()))
            .bind(filter.entity_id)
            .bind(filter.include_inactive)
            .fetch_all(db)
            .await
    }

    /// Every global tracker, active or not. Inactive ones may still be
    /// re-admitted by a campaign override.
    pub async fn list_global<'e, E: PgExecutor<'e>>(db: E) -> Result<Vec<Tracker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trackers WHERE scope = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Tracker>(&query)
            .bind(TrackerScope::Global.as_str())
            .fetch_all(db)
            .await
    }

    /// Every entity-scope tracker bound to the given entity.
    pub async fn list_for_entity<'e, E: PgExecutor<'e>>(
        db: E,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<Tracker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trackers
             WHERE scope = $1 AND entity_type = $2 AND entity_id = $3
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Tracker>(&query)
            .bind(TrackerScope::Entity.as_str())
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(db)
            .await
    }

    /// Fetch trackers by id. Missing ids are silently skipped.
    pub async fn list_by_ids<'e, E: PgExecutor<'e>>(
        db: E,
        ids: &[DbId],
    ) -> Result<Vec<Tracker>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM trackers WHERE id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, Tracker>(&query)
            .bind(ids)
            .fetch_all(db)
            .await
    }

    /// Update a tracker. Only non-`None` fields in `input` are applied.
    pub async fn update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        input: &UpdateTracker,
    ) -> Result<Option<Tracker>, sqlx::Error> {
        let query = format!(
            "UPDATE trackers SET
                name = COALESCE($2, name),
                provider = COALESCE($3, provider),
                load_position = COALESCE($4, load_position),
                code = COALESCE($5, code),
                priority = COALESCE($6, priority),
                is_active = COALESCE($7, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tracker>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.provider)
            .bind(input.load_position.map(|p| p.as_str()))
            .bind(&input.code)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_optional(db)
            .await
    }

    /// Hard-delete a tracker; campaign overrides cascade.
    pub async fn delete<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trackers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every entity-scope tracker bound to a deleted entity.
    pub async fn delete_for_entity<'e, E: PgExecutor<'e>>(
        db: E,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM trackers WHERE scope = $1 AND entity_type = $2 AND entity_id = $3",
        )
        .bind(TrackerScope::Entity.as_str())
        .bind(entity_type)
        .bind(entity_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
