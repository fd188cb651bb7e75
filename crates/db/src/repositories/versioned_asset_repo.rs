//! Repository for the `templates` and `form_schemas` tables.
//!
//! Both tables share the same layout; every method takes the
//! [`AssetKind`] that selects the table.

use pagedesk_core::lifecycle::AssetStatus;
use pagedesk_core::structure::AssetKind;
use pagedesk_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::versioned_asset::{UpdateVersionedAsset, VersionedAsset};

/// Column list shared by both asset tables.
const COLUMNS: &str = "id, slug, name, description, version, status, structure, usage_count, \
    created_by, published_at, created_at, updated_at";

fn table(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Template => "templates",
        AssetKind::FormSchema => "form_schemas",
    }
}

/// Insert payload for a new draft version.
#[derive(Debug, Clone)]
pub struct NewAssetVersion<'a> {
    pub slug: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub version: i32,
    pub structure: &'a serde_json::Value,
    pub created_by: Option<DbId>,
}

/// Provides version-lifecycle storage for templates and form schemas.
pub struct VersionedAssetRepo;

impl VersionedAssetRepo {
    /// Insert a new `draft` version.
    ///
    /// A second draft for the same slug violates
    /// `uq_<table>_one_draft_per_slug`; a duplicate version number violates
    /// `uq_<table>_slug_version`.
    pub async fn create_draft<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        input: &NewAssetVersion<'_>,
    ) -> Result<VersionedAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (slug, name, description, version, status, structure, created_by)
             VALUES ($1, $2, $3, $4, 'draft', $5, $6)
             RETURNING {COLUMNS}",
            table = table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(input.slug)
            .bind(input.name)
            .bind(input.description)
            .bind(input.version)
            .bind(input.structure)
            .bind(input.created_by)
            .fetch_one(db)
            .await
    }

    /// Find a version by its primary key.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
    ) -> Result<Option<VersionedAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", table(kind));
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a version by primary key and lock the row for the current transaction.
    pub async fn find_by_id_for_update<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
    ) -> Result<Option<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE id = $1 FOR UPDATE",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// List versions across all slugs, optionally filtered.
    pub async fn list<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        slug: Option<&str>,
        status: Option<AssetStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {}
             WHERE ($1::text IS NULL OR slug = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY slug ASC, version DESC
             LIMIT $3 OFFSET $4",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(slug)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
    }

    /// All versions of one slug, newest first.
    pub async fn list_versions<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        slug: &str,
    ) -> Result<Vec<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE slug = $1 ORDER BY version DESC",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(slug)
            .fetch_all(db)
            .await
    }

    /// The highest version of a slug, if any.
    pub async fn find_latest<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        slug: &str,
    ) -> Result<Option<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE slug = $1 ORDER BY version DESC LIMIT 1",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(slug)
            .fetch_optional(db)
            .await
    }

    /// Apply an edit to a version that is still a draft.
    ///
    /// Returns `None` when the row does not exist or is no longer a draft.
    pub async fn update_draft<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
        input: &UpdateVersionedAsset,
    ) -> Result<Option<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                structure = COALESCE($4, structure)
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.structure)
            .fetch_optional(db)
            .await
    }

    /// Mark a draft as published and stamp `published_at`.
    pub async fn mark_published<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
    ) -> Result<Option<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET status = 'published', published_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Retire one published version.
    pub async fn mark_retired<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
    ) -> Result<Option<VersionedAsset>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET status = 'retired'
             WHERE id = $1 AND status = 'published'
             RETURNING {COLUMNS}",
            table(kind)
        );
        sqlx::query_as::<_, VersionedAsset>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Retire the given published versions of a slug. Returns the number retired.
    pub async fn retire_versions<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        slug: &str,
        versions: &[i32],
    ) -> Result<u64, sqlx::Error> {
        if versions.is_empty() {
            return Ok(0);
        }
        let query = format!(
            "UPDATE {} SET status = 'retired'
             WHERE slug = $1 AND version = ANY($2) AND status = 'published'",
            table(kind)
        );
        let result = sqlx::query(&query)
            .bind(slug)
            .bind(versions)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Increment `usage_count` when a campaign referencing this version goes live.
    pub async fn increment_usage<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE {} SET usage_count = usage_count + 1 WHERE id = $1",
            table(kind)
        );
        sqlx::query(&query).bind(id).execute(db).await?;
        Ok(())
    }

    /// Delete a draft version. Returns `true` if a row was removed.
    pub async fn delete_draft<'e, E: PgExecutor<'e>>(
        db: E,
        kind: AssetKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1 AND status = 'draft'",
            table(kind)
        );
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        Ok(result.rows_affected() > 0)
    }
}
