//! Repository for the `redirects` table.

use pagedesk_core::redirects::REDIRECT_PERMANENT;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::redirect::{CreateRedirect, Redirect, UpdateRedirect};

/// Column list for redirect queries.
const COLUMNS: &str = "id, source_path, target_path, redirect_type, is_active, hit_count, \
    created_at, updated_at";

/// Provides CRUD and lookup operations for redirects.
pub struct RedirectRepo;

impl RedirectRepo {
    /// Insert a new redirect. A duplicate source violates `uq_redirects_source_path`.
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateRedirect,
    ) -> Result<Redirect, sqlx::Error> {
        let query = format!(
            "INSERT INTO redirects (source_path, target_path, redirect_type, is_active)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Redirect>(&query)
            .bind(&input.source_path)
            .bind(&input.target_path)
            .bind(input.redirect_type.unwrap_or(REDIRECT_PERMANENT))
            .bind(input.is_active)
            .fetch_one(db)
            .await
    }

    /// Find a redirect by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Redirect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM redirects WHERE id = $1");
        sqlx::query_as::<_, Redirect>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find the redirect for a source path, active or not.
    pub async fn find_by_source<'e, E: PgExecutor<'e>>(
        db: E,
        source_path: &str,
    ) -> Result<Option<Redirect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM redirects WHERE source_path = $1");
        sqlx::query_as::<_, Redirect>(&query)
            .bind(source_path)
            .fetch_optional(db)
            .await
    }

    /// List redirects, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Redirect>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM redirects
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Redirect>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
    }

    /// Update a redirect. Only non-`None` fields in `input` are applied.
    pub async fn update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        input: &UpdateRedirect,
    ) -> Result<Option<Redirect>, sqlx::Error> {
        let query = format!(
            "UPDATE redirects SET
                target_path = COALESCE($2, target_path),
                redirect_type = COALESCE($3, redirect_type),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Redirect>(&query)
            .bind(id)
            .bind(&input.target_path)
            .bind(input.redirect_type)
            .bind(input.is_active)
            .fetch_optional(db)
            .await
    }

    /// Delete a redirect. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve an active redirect for a path and count the hit in one statement.
    pub async fn record_hit<'e, E: PgExecutor<'e>>(
        db: E,
        source_path: &str,
    ) -> Result<Option<Redirect>, sqlx::Error> {
        let query = format!(
            "UPDATE redirects SET hit_count = hit_count + 1
             WHERE source_path = $1 AND is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Redirect>(&query)
            .bind(source_path)
            .fetch_optional(db)
            .await
    }
}
