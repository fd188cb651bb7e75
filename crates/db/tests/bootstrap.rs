use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    pagedesk_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "exams",
        "colleges",
        "scholarships",
        "templates",
        "form_schemas",
        "campaigns",
        "trackers",
        "campaign_trackers",
        "slug_records",
        "redirects",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every entity table keeps `updated_at` current through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_triggers_installed(pool: PgPool) {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT event_object_table::text
         FROM information_schema.triggers
         WHERE trigger_name LIKE 'trg_%_updated_at'
         GROUP BY event_object_table
         ORDER BY event_object_table",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let tables: Vec<&str> = rows.iter().map(|(t,)| t.as_str()).collect();
    for table in [
        "campaigns",
        "colleges",
        "exams",
        "form_schemas",
        "redirects",
        "scholarships",
        "slug_records",
        "templates",
        "trackers",
        "users",
    ] {
        assert!(tables.contains(&table), "{table} is missing its updated_at trigger");
    }
}
