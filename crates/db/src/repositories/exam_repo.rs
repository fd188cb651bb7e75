//! Repository for the `exams` table.

use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::exam::{CreateExam, Exam, UpdateExam};
use crate::models::filter::ContentListFilter;

/// Column list for exam queries.
const COLUMNS: &str = "id, name, slug, full_path, status, conducting_body, exam_level, \
    registration_start, registration_end, exam_date, official_url, description, seo, \
    published_at, created_at, updated_at";

/// Provides CRUD operations for exams.
pub struct ExamRepo;

impl ExamRepo {
    /// Insert a new exam in `draft` with an already-normalised slug and path.
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateExam,
        slug: &str,
        full_path: &str,
    ) -> Result<Exam, sqlx::Error> {
        let query = format!(
            "INSERT INTO exams
                (name, slug, full_path, conducting_body, exam_level, registration_start,
                 registration_end, exam_date, official_url, description, seo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(full_path)
            .bind(&input.conducting_body)
            .bind(&input.exam_level)
            .bind(input.registration_start)
            .bind(input.registration_end)
            .bind(input.exam_date)
            .bind(&input.official_url)
            .bind(&input.description)
            .bind(&input.seo)
            .fetch_one(db)
            .await
    }

    /// Find an exam by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exams WHERE id = $1");
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a exam by id and lock its row for the rest of the transaction.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exams WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// List exams, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        filter: &ContentListFilter,
    ) -> Result<Vec<Exam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exams
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR slug ILIKE $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(filter.status_text())
            .bind(filter.search_pattern())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(db)
            .await
    }

    /// Update an exam. Only non-`None` fields in `input` are applied.
    ///
    /// `input.slug` must already be normalised; `full_path` accompanies it.
    pub async fn update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        input: &UpdateExam,
        full_path: Option<&str>,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!(
            "UPDATE exams SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                full_path = COALESCE($4, full_path),
                conducting_body = COALESCE($5, conducting_body),
                exam_level = COALESCE($6, exam_level),
                registration_start = COALESCE($7, registration_start),
                registration_end = COALESCE($8, registration_end),
                exam_date = COALESCE($9, exam_date),
                official_url = COALESCE($10, official_url),
                description = COALESCE($11, description),
                seo = COALESCE($12, seo)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(full_path)
            .bind(&input.conducting_body)
            .bind(&input.exam_level)
            .bind(input.registration_start)
            .bind(input.registration_end)
            .bind(input.exam_date)
            .bind(&input.official_url)
            .bind(&input.description)
            .bind(&input.seo)
            .fetch_optional(db)
            .await
    }

    /// Set the publication status. The first transition to `live` stamps
    /// `published_at`.
    pub async fn set_status<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        status: PublicationStatus,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!(
            "UPDATE exams SET
                status = $2,
                published_at = CASE WHEN $2 = 'live' THEN COALESCE(published_at, NOW())
                                    ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(db)
            .await
    }

    /// Delete an exam. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an exam with the given id exists.
    pub async fn exists<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM exams WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(row.0)
    }
}
