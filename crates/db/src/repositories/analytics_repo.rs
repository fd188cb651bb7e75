//! Read-only aggregates for the dashboard and the SEO audit.

use sqlx::PgExecutor;

use crate::models::analytics::{RedirectTotals, SeoAuditRow, StatusCount, TrackerTotals};

/// Provides aggregate queries across resources.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Record counts grouped by resource and status.
    pub async fn status_counts<'e, E: PgExecutor<'e>>(
        db: E,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT resource, status, COUNT(*) AS count FROM (
                SELECT 'exam' AS resource, status FROM exams
                UNION ALL SELECT 'college', status FROM colleges
                UNION ALL SELECT 'scholarship', status FROM scholarships
                UNION ALL SELECT 'campaign', status FROM campaigns
                UNION ALL SELECT 'template', status FROM templates
                UNION ALL SELECT 'form_schema', status FROM form_schemas
             ) AS all_records
             GROUP BY resource, status
             ORDER BY resource, status",
        )
        .fetch_all(db)
        .await
    }

    /// Total and active tracker counts.
    pub async fn tracker_totals<'e, E: PgExecutor<'e>>(
        db: E,
    ) -> Result<TrackerTotals, sqlx::Error> {
        sqlx::query_as::<_, TrackerTotals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE is_active) AS active
             FROM trackers",
        )
        .fetch_one(db)
        .await
    }

    /// Redirect counts and the summed hit counter.
    pub async fn redirect_totals<'e, E: PgExecutor<'e>>(
        db: E,
    ) -> Result<RedirectTotals, sqlx::Error> {
        sqlx::query_as::<_, RedirectTotals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE is_active) AS active,
                    COALESCE(SUM(hit_count), 0)::bigint AS hits
             FROM redirects",
        )
        .fetch_one(db)
        .await
    }

    /// Every non-archived public page with its SEO blob, most recently
    /// touched first.
    pub async fn seo_audit_rows<'e, E: PgExecutor<'e>>(
        db: E,
    ) -> Result<Vec<SeoAuditRow>, sqlx::Error> {
        sqlx::query_as::<_, SeoAuditRow>(
            "SELECT * FROM (
                SELECT 'exam' AS entity_type, id AS entity_id, name, full_path, status, seo, updated_at
                  FROM exams
                UNION ALL SELECT 'college', id, name, full_path, status, seo, updated_at
                  FROM colleges
                UNION ALL SELECT 'scholarship', id, name, full_path, status, seo, updated_at
                  FROM scholarships
                UNION ALL SELECT 'campaign', id, name, full_path, status, seo, updated_at
                  FROM campaigns
             ) AS pages
             WHERE status <> 'archived'
             ORDER BY updated_at DESC, entity_type, entity_id",
        )
        .fetch_all(db)
        .await
    }
}
