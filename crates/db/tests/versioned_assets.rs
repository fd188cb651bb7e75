//! Integration tests for template/form-schema version storage.
//!
//! Exercises the repository layer against a real database:
//! - Draft creation and editing
//! - Publish, supersede and retire
//! - The one-draft-per-slug and unique version constraints
//! - Usage counting

use pagedesk_core::lifecycle::AssetStatus;
use pagedesk_core::structure::AssetKind;
use pagedesk_db::models::versioned_asset::UpdateVersionedAsset;
use pagedesk_db::repositories::versioned_asset_repo::NewAssetVersion;
use pagedesk_db::repositories::VersionedAssetRepo;
use serde_json::json;
use sqlx::PgPool;

fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draft_create_edit_publish(pool: PgPool) {
    let structure = json!({"sections": []});
    let draft = VersionedAssetRepo::create_draft(
        &pool,
        AssetKind::Template,
        &NewAssetVersion {
            slug: "admissions-landing",
            name: "Admissions landing",
            description: None,
            version: 1,
            structure: &structure,
            created_by: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(draft.version, 1);
    assert_eq!(draft.status, AssetStatus::Draft);
    assert_eq!(draft.usage_count, 0);
    assert!(draft.published_at.is_none());

    let edited = VersionedAssetRepo::update_draft(
        &pool,
        AssetKind::Template,
        draft.id,
        &UpdateVersionedAsset {
            structure: Some(json!({"sections": [{"type": "hero"}]})),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("draft should be editable");
    assert_eq!(edited.structure["sections"][0]["type"], "hero");
    assert_eq!(edited.name, "Admissions landing");

    let published = VersionedAssetRepo::mark_published(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap()
        .expect("draft should publish");
    assert_eq!(published.status, AssetStatus::Published);
    assert!(published.published_at.is_some());

    // Published rows are immutable and cannot be published twice.
    let no_edit = VersionedAssetRepo::update_draft(
        &pool,
        AssetKind::Template,
        draft.id,
        &UpdateVersionedAsset {
            name: Some("Renamed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(no_edit.is_none());
    assert!(VersionedAssetRepo::mark_published(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap()
        .is_none());

    let reread = VersionedAssetRepo::find_by_id(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.structure, published.structure);
    assert_eq!(reread.name, "Admissions landing");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_draft_per_slug(pool: PgPool) {
    let structure = json!({"fields": []});
    let first = NewAssetVersion {
        slug: "lead-form",
        name: "Lead form",
        description: None,
        version: 1,
        structure: &structure,
        created_by: None,
    };
    VersionedAssetRepo::create_draft(&pool, AssetKind::FormSchema, &first)
        .await
        .unwrap();

    let second = NewAssetVersion {
        version: 2,
        ..first.clone()
    };
    let err = VersionedAssetRepo::create_draft(&pool, AssetKind::FormSchema, &second)
        .await
        .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("uq_form_schemas_one_draft_per_slug")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_version_rejected(pool: PgPool) {
    let structure = json!([{"name": "email"}]);
    let v1 = NewAssetVersion {
        slug: "lead-form",
        name: "Lead form",
        description: None,
        version: 1,
        structure: &structure,
        created_by: None,
    };
    let draft = VersionedAssetRepo::create_draft(&pool, AssetKind::FormSchema, &v1)
        .await
        .unwrap();
    VersionedAssetRepo::mark_published(&pool, AssetKind::FormSchema, draft.id)
        .await
        .unwrap();

    let err = VersionedAssetRepo::create_draft(&pool, AssetKind::FormSchema, &v1)
        .await
        .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("uq_form_schemas_slug_version")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retire_superseded_versions(pool: PgPool) {
    let structure = json!({"sections": [{"type": "hero"}]});
    let mut ids = Vec::new();
    for version in 1..=2 {
        let draft = VersionedAssetRepo::create_draft(
            &pool,
            AssetKind::Template,
            &NewAssetVersion {
                slug: "scholarship-page",
                name: "Scholarship page",
                description: Some("Main layout"),
                version,
                structure: &structure,
                created_by: None,
            },
        )
        .await
        .unwrap();
        VersionedAssetRepo::mark_published(&pool, AssetKind::Template, draft.id)
            .await
            .unwrap();
        ids.push(draft.id);
    }

    let retired =
        VersionedAssetRepo::retire_versions(&pool, AssetKind::Template, "scholarship-page", &[1])
            .await
            .unwrap();
    assert_eq!(retired, 1);

    let versions = VersionedAssetRepo::list_versions(&pool, AssetKind::Template, "scholarship-page")
        .await
        .unwrap();
    let statuses: Vec<(i32, AssetStatus)> =
        versions.iter().map(|v| (v.version, v.status)).collect();
    assert_eq!(
        statuses,
        vec![(2, AssetStatus::Published), (1, AssetStatus::Retired)]
    );

    let latest = VersionedAssetRepo::find_latest(&pool, AssetKind::Template, "scholarship-page")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, ids[1]);

    // Retiring only applies to published rows.
    assert!(VersionedAssetRepo::mark_retired(&pool, AssetKind::Template, ids[0])
        .await
        .unwrap()
        .is_none());
    assert!(VersionedAssetRepo::mark_retired(&pool, AssetKind::Template, ids[1])
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_only_drafts_and_count_usage(pool: PgPool) {
    let structure = json!({"sections": [{"type": "hero"}]});
    let draft = VersionedAssetRepo::create_draft(
        &pool,
        AssetKind::Template,
        &NewAssetVersion {
            slug: "exam-page",
            name: "Exam page",
            description: None,
            version: 1,
            structure: &structure,
            created_by: None,
        },
    )
    .await
    .unwrap();
    VersionedAssetRepo::mark_published(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap();

    assert!(!VersionedAssetRepo::delete_draft(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap());

    VersionedAssetRepo::increment_usage(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap();
    VersionedAssetRepo::increment_usage(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap();
    let row = VersionedAssetRepo::find_by_id(&pool, AssetKind::Template, draft.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.usage_count, 2);

    let listed = VersionedAssetRepo::list(
        &pool,
        AssetKind::Template,
        Some("exam-page"),
        Some(AssetStatus::Published),
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}
