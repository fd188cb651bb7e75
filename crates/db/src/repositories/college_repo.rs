//! Repository for the `colleges` table.

use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::college::{College, CreateCollege, UpdateCollege};
use crate::models::filter::ContentListFilter;

/// Column list for college queries.
const COLUMNS: &str = "id, name, slug, full_path, status, city, state, ownership, \
    established_year, official_url, description, seo, published_at, created_at, updated_at";

/// Provides CRUD operations for colleges.
pub struct CollegeRepo;

impl CollegeRepo {
    /// Insert a new college in `draft` with an already-normalised slug and path.
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateCollege,
        slug: &str,
        full_path: &str,
    ) -> Result<College, sqlx::Error> {
        let query = format!(
            "INSERT INTO colleges
                (name, slug, full_path, city, state, ownership, established_year,
                 official_url, description, seo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, College>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(full_path)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.ownership)
            .bind(input.established_year)
            .bind(&input.official_url)
            .bind(&input.description)
            .bind(&input.seo)
            .fetch_one(db)
            .await
    }

    /// Find a college by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<College>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colleges WHERE id = $1");
        sqlx::query_as::<_, College>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a college by id and lock its row for the rest of the transaction.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<College>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colleges WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, College>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// List colleges, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        filter: &ContentListFilter,
    ) -> Result<Vec<College>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM colleges
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR slug ILIKE $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, College>(&query)
            .bind(filter.status_text())
            .bind(filter.search_pattern())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(db)
            .await
    }

    /// Update a college. Only non-`None` fields in `input` are applied.
    pub async fn update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        input: &UpdateCollege,
        full_path: Option<&str>,
    ) -> Result<Option<College>, sqlx::Error> {
        let query = format!(
            "UPDATE colleges SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                full_path = COALESCE($4, full_path),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                ownership = COALESCE($7, ownership),
                established_year = COALESCE($8, established_year),
                official_url = COALESCE($9, official_url),
                description = COALESCE($10, description),
                seo = COALESCE($11, seo)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, College>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(full_path)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.ownership)
            .bind(input.established_year)
            .bind(&input.official_url)
            .bind(&input.description)
            .bind(&input.seo)
            .fetch_optional(db)
            .await
    }

    /// Set the publication status, stamping `published_at` on first go-live.
    pub async fn set_status<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        status: PublicationStatus,
    ) -> Result<Option<College>, sqlx::Error> {
        let query = format!(
            "UPDATE colleges SET
                status = $2,
                published_at = CASE WHEN $2 = 'live' THEN COALESCE(published_at, NOW())
                                    ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, College>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(db)
            .await
    }

    /// Delete a college. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM colleges WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a college with the given id exists.
    pub async fn exists<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM colleges WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(row.0)
    }
}
