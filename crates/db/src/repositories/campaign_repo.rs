//! Repository for the `campaigns` table.

use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::campaign::{Campaign, CampaignAssetRefs, CreateCampaign, UpdateCampaign};
use crate::models::filter::ContentListFilter;

/// Column list for campaign queries.
const COLUMNS: &str = "id, name, slug, url_prefix, full_path, status, template_id, \
    template_version, form_schema_id, form_schema_version, entity_type, entity_id, content, \
    seo, published_at, created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign in `draft`.
    ///
    /// `slug`, `url_prefix` and `full_path` must already be normalised; `refs`
    /// carries the resolved template/form versions.
    pub async fn create<'e, E: PgExecutor<'e>>(
        db: E,
        input: &CreateCampaign,
        slug: &str,
        url_prefix: &str,
        full_path: &str,
        refs: &CampaignAssetRefs,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (name, slug, url_prefix, full_path, template_id, template_version,
                 form_schema_id, form_schema_version, entity_type, entity_id, content, seo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     COALESCE($11, '{{}}'::jsonb), COALESCE($12, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(url_prefix)
            .bind(full_path)
            .bind(refs.template_id)
            .bind(refs.template_version)
            .bind(refs.form_schema_id)
            .bind(refs.form_schema_version)
            .bind(input.entity_type.map(|k| k.as_str()))
            .bind(input.entity_id)
            .bind(&input.content)
            .bind(&input.seo)
            .fetch_one(db)
            .await
    }

    /// Find a campaign by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a campaign and lock its row for the current transaction.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// List campaigns, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        filter: &ContentListFilter,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR slug ILIKE $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(filter.status_text())
            .bind(filter.search_pattern())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(db)
            .await
    }

    /// Update a campaign. Only non-`None` fields are applied.
    ///
    /// `path` carries the normalised `(slug, url_prefix, full_path)` when the
    /// public path changes.
    pub async fn update<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        input: &UpdateCampaign,
        path: Option<(&str, &str, &str)>,
        refs: &CampaignAssetRefs,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                url_prefix = COALESCE($4, url_prefix),
                full_path = COALESCE($5, full_path),
                template_id = COALESCE($6, template_id),
                template_version = COALESCE($7, template_version),
                form_schema_id = COALESCE($8, form_schema_id),
                form_schema_version = COALESCE($9, form_schema_version),
                content = COALESCE($10, content),
                seo = COALESCE($11, seo)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(path.map(|p| p.0))
            .bind(path.map(|p| p.1))
            .bind(path.map(|p| p.2))
            .bind(refs.template_id)
            .bind(refs.template_version)
            .bind(refs.form_schema_id)
            .bind(refs.form_schema_version)
            .bind(&input.content)
            .bind(&input.seo)
            .fetch_optional(db)
            .await
    }

    /// Set the publication status, stamping `published_at` on first go-live.
    pub async fn set_status<'e, E: PgExecutor<'e>>(
        db: E,
        id: DbId,
        status: PublicationStatus,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                status = $2,
                published_at = CASE WHEN $2 = 'live' THEN COALESCE(published_at, NOW())
                                    ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(db)
            .await
    }

    /// Delete a campaign (overrides cascade). Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(db: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
