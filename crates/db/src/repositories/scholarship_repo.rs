//! Repository for the `scholarships` table.

use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::filter::ContentListFilter;
use crate::models::scholarship::{CreateScholarship, Scholarship, UpdateScholarship};

/// Column list for scholarship queries.
const COLUMNS: &str = "id, name, slug, full_path, status, provider, amount_min, amount_max, \
    deadline, eligibility, official_url, description, seo, published_at, created_at, updated_at";

/// Provides CRUD operations for scholarships.
pub struct ScholarshipRepo;

impl ScholarshipRepo {
    /// Insert a new scholarship in `draft` with an already-normalised slug and path.
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateScholarship,
        slug: &str,
        full_path: &str,
    ) -> Result<Scholarship, sqlx::Error> {
        let query = format!(
            "INSERT INTO scholarships
                (name, slug, full_path, provider, amount_min, amount_max, deadline,
                 eligibility, official_url, description, seo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scholarship>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(full_path)
            .bind(&input.provider)
            .bind(input.amount_min)
            .bind(input.amount_max)
            .bind(input.deadline)
            .bind(&input.eligibility)
            .bind(&input.official_url)
            .bind(&input.description)
            .bind(&input.seo)
            .fetch_one(db)
            .await
    }

    /// Find a scholarship by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Scholarship>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scholarships WHERE id = $1");
        sqlx::query_as::<_, Scholarship>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a scholarship by id and lock its row for the rest of the transaction.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Scholarship>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scholarships WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Scholarship>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// List scholarships, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        filter: &ContentListFilter,
    ) -> Result<Vec<Scholarship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scholarships
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR slug ILIKE $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Scholarship>(&query)
            .bind(filter.status_text())
            .bind(filter.search_pattern())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(db)
            .await
    }

    /// Update a scholarship. Only non-`None` fields in `input` are applied.
    pub async fn update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        input: &UpdateScholarship,
        full_path: Option<&str>,
    ) -> Result<Option<Scholarship>, sqlx::Error> {
        let query = format!(
            "UPDATE scholarships SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                full_path = COALESCE($4, full_path),
                provider = COALESCE($5, provider),
                amount_min = COALESCE($6, amount_min),
                amount_max = COALESCE($7, amount_max),
                deadline = COALESCE($8, deadline),
                eligibility = COALESCE($9, eligibility),
                official_url = COALESCE($10, official_url),
                description = COALESCE($11, description),
                seo = COALESCE($12, seo)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scholarship>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(full_path)
            .bind(&input.provider)
            .bind(input.amount_min)
            .bind(input.amount_max)
            .bind(input.deadline)
            .bind(&input.eligibility)
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
    ) -> Result<Option<Scholarship>, sqlx::Error> {
        let query = format!(
            "UPDATE scholarships SET
                status = $2,
                published_at = CASE WHEN $2 = 'live' THEN COALESCE(published_at, NOW())
                                    ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scholarship>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(db)
            .await
    }

    /// Delete a scholarship. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scholarships WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a scholarship with the given id exists.
    pub async fn exists<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM scholarships WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(row.0)
    }
}
