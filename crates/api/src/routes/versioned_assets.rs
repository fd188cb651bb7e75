//! Route definitions for versioned assets (`/admin/templates` and
//! `/admin/form-schemas`).

use axum::routing::{get, post};
use axum::{Extension, Router};
use pagedesk_core::structure::AssetKind;

use crate::handlers::versioned_assets;
use crate::state::AppState;

/// Routes for one asset kind. The kind reaches handlers as an [`Extension`].
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /by-slug/{slug}/versions  -> versions_by_slug
/// GET    /{id}                     -> get_by_id
/// PATCH  /{id}                     -> update
/// DELETE /{id}                     -> delete
/// POST   /{id}/publish             -> publish
/// POST   /{id}/retire              -> retire
/// POST   /{id}/versions            -> new_version
/// ```
pub fn router(kind: AssetKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(versioned_assets::list).post(versioned_assets::create),
        )
        .route(
            "/by-slug/{slug}/versions",
            get(versioned_assets::versions_by_slug),
        )
        .route(
            "/{id}",
            get(versioned_assets::get_by_id)
                .patch(versioned_assets::update)
                .delete(versioned_assets::delete),
        )
        .route("/{id}/publish", post(versioned_assets::publish))
        .route("/{id}/retire", post(versioned_assets::retire))
        .route("/{id}/versions", post(versioned_assets::new_version))
        .layer(Extension(kind))
}
