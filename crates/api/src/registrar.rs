//! Slug registrar: applies the path policy of `pagedesk_core::slugs` against
//! the `slug_records` table.
//!
//! Every function takes an open connection so callers can run the
//! reservation in the same transaction as the owning record's write. A
//! failed reservation rolls the whole write back.

use pagedesk_core::content::EntityKind;
use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::redirects::{self, REDIRECT_PERMANENT};
use pagedesk_core::slugs::{self, Availability, SlugStatus};
use pagedesk_core::types::DbId;
use pagedesk_db::models::redirect::{CreateRedirect, Redirect};
use pagedesk_db::models::slug_record::{CreateSlugRecord, SlugRecord};
use pagedesk_db::repositories::{RedirectRepo, SlugRepo};
use sqlx::{PgConnection, PgExecutor};

use crate::error::AppResult;

/// The record that owns (or wants to own) a path.
#[derive(Debug, Clone, Copy)]
pub struct PathOwner<'a> {
    pub kind: EntityKind,
    pub id: DbId,
    pub name: &'a str,
}

/// Reserve `full_path` for `owner`.
///
/// Returns the existing record when the owner already holds the path; a
/// draft record held by a public owner is activated first.
/// A path held by someone else is a conflict; a retired path can never be
/// reserved again.
pub async fn reserve(
    conn: &mut PgConnection,
    full_path: &str,
    owner: &PathOwner<'_>,
    owner_is_public: bool,
) -> AppResult<SlugRecord> {
    if let Some(record) = SlugRepo::find_by_path_for_update(&mut *conn, full_path).await? {
        slugs::check_reservation(
            full_path,
            Some(&record.holder()),
            owner.kind.as_str(),
            owner.id,
        )?;
        let wanted = slugs::initial_status(owner_is_public);
        if record.status == SlugStatus::Draft && wanted == SlugStatus::Active {
            if let Some(active) = SlugRepo::set_status(&mut *conn, full_path, wanted).await? {
                tracing::debug!(full_path, "Held path activated");
                return Ok(active);
            }
        }
        return Ok(record);
    }

    let record = SlugRepo::create(
        &mut *conn,
        &CreateSlugRecord {
            full_path: full_path.to_string(),
            entity_type: owner.kind.to_string(),
            entity_id: owner.id,
            entity_name: owner.name.to_string(),
            status: slugs::initial_status(owner_is_public),
        },
    )
    .await?;

    tracing::debug!(full_path, entity_type = %owner.kind, entity_id = owner.id, "Path reserved");
    Ok(record)
}

/// Keep a path's reservation status in step with its owner's publication
/// status: going live activates it, archiving retires it.
pub async fn sync_status(
    conn: &mut PgConnection,
    full_path: &str,
    status: PublicationStatus,
) -> AppResult<()> {
    let target = match status {
        PublicationStatus::Live => SlugStatus::Active,
        PublicationStatus::Archived => SlugStatus::Retired,
        PublicationStatus::Draft | PublicationStatus::Closed => return Ok(()),
    };
    if SlugRepo::set_status(&mut *conn, full_path, target)
        .await?
        .is_some()
    {
        tracing::debug!(full_path, status = %target, "Path status changed");
    }
    Ok(())
}

/// Move an owner from `old_path` to `new_path`.
///
/// The new path is reserved first, then the old one is retired. A redirect
/// whose source is the new path would shadow the owner's page, so it is
/// removed. When the old path was publicly active a 301 redirect to the new
/// path is created, unless a redirect for that source already exists.
/// Returns the created redirect.
pub async fn change_path(
    conn: &mut PgConnection,
    old_path: &str,
    new_path: &str,
    owner: &PathOwner<'_>,
    owner_is_public: bool,
) -> AppResult<Option<Redirect>> {
    reserve(&mut *conn, new_path, owner, owner_is_public).await?;

    if let Some(stale) = RedirectRepo::find_by_source(&mut *conn, new_path).await? {
        RedirectRepo::delete(&mut *conn, stale.id).await?;
        tracing::info!(
            redirect_id = stale.id,
            source = new_path,
            target = %stale.target_path,
            "Redirect removed from reclaimed path"
        );
    }

    let was_active = SlugRepo::find_by_path_for_update(&mut *conn, old_path)
        .await?
        .is_some_and(|r| r.status == SlugStatus::Active);
    SlugRepo::set_status(&mut *conn, old_path, SlugStatus::Retired).await?;

    if !was_active || RedirectRepo::find_by_source(&mut *conn, old_path).await?.is_some() {
        return Ok(None);
    }

    redirects::validate_redirect(old_path, new_path, REDIRECT_PERMANENT)?;
    let onward = RedirectRepo::find_by_source(&mut *conn, new_path).await?;
    redirects::check_loop(old_path, onward.as_ref().map(|r| r.target_path.as_str()))?;

    let redirect = RedirectRepo::create(
        &mut *conn,
        &CreateRedirect {
            source_path: old_path.to_string(),
            target_path: new_path.to_string(),
            redirect_type: Some(REDIRECT_PERMANENT),
            is_active: Some(true),
        },
    )
    .await?;

    tracing::info!(
        redirect_id = redirect.id,
        source = old_path,
        target = new_path,
        "Redirect created for changed path"
    );
    Ok(Some(redirect))
}

/// Retire a path whose owner is gone. The path stays reserved forever.
pub async fn release(conn: &mut PgConnection, full_path: &str) -> AppResult<()> {
    SlugRepo::set_status(&mut *conn, full_path, SlugStatus::Retired).await?;
    Ok(())
}

/// Keep the registry's display name current after an owner is renamed.
pub async fn rename<'e, E: PgExecutor<'e>>(db: E, owner: &PathOwner<'_>) -> AppResult<()> {
    SlugRepo::rename_owner(db, owner.kind.as_str(), owner.id, owner.name).await?;
    Ok(())
}

/// Report whether `full_path` could be reserved, optionally on behalf of an
/// existing owner (whose own path counts as available).
pub async fn check_availability<'e, E: PgExecutor<'e>>(
    db: E,
    full_path: &str,
    requester: Option<(EntityKind, DbId)>,
) -> AppResult<Availability> {
    let record = SlugRepo::find_by_path(db, full_path).await?;
    let holder = record.as_ref().map(SlugRecord::holder);
    Ok(slugs::availability(
        holder.as_ref(),
        requester.map(|(kind, id)| (kind.as_str(), id)),
    ))
}
