//! Tests for the slug registrar run directly against a connection.

use assert_matches::assert_matches;
use pagedesk_api::error::AppError;
use pagedesk_api::registrar::{self, PathOwner};
use pagedesk_core::content::EntityKind;
use pagedesk_core::error::CoreError;
use pagedesk_core::slugs::SlugStatus;
use pagedesk_db::repositories::SlugRepo;
use sqlx::PgPool;

fn exam(id: i64) -> PathOwner<'static> {
    PathOwner {
        kind: EntityKind::Exam,
        id,
        name: "Alpha",
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rereserving_held_draft_path_for_public_owner_activates_it(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let draft = registrar::reserve(&mut conn, "/exams/alpha", &exam(7), false)
        .await
        .unwrap();
    assert_eq!(draft.status, SlugStatus::Draft);

    let still_draft = registrar::reserve(&mut conn, "/exams/alpha", &exam(7), false)
        .await
        .unwrap();
    assert_eq!(still_draft.id, draft.id);
    assert_eq!(still_draft.status, SlugStatus::Draft);

    let active = registrar::reserve(&mut conn, "/exams/alpha", &exam(7), true)
        .await
        .unwrap();
    assert_eq!(active.id, draft.id);
    assert_eq!(active.status, SlugStatus::Active);

    let stored = SlugRepo::find_by_path(&mut *conn, "/exams/alpha")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SlugStatus::Active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_owner_does_not_demote_active_path(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    registrar::reserve(&mut conn, "/exams/alpha", &exam(7), true)
        .await
        .unwrap();

    let record = registrar::reserve(&mut conn, "/exams/alpha", &exam(7), false)
        .await
        .unwrap();
    assert_eq!(record.status, SlugStatus::Active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn held_path_is_refused_to_another_owner(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    registrar::reserve(&mut conn, "/exams/alpha", &exam(7), false)
        .await
        .unwrap();

    let result = registrar::reserve(&mut conn, "/exams/alpha", &exam(8), true).await;
    assert_matches!(result, Err(AppError::Core(CoreError::Conflict(_))));

    let stored = SlugRepo::find_by_path(&mut *conn, "/exams/alpha")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.entity_id, 7);
    assert_eq!(stored.status, SlugStatus::Draft);
}
