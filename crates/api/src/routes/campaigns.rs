//! Route definitions for the `/admin/campaigns` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/admin/campaigns`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/status     -> set_status
/// GET    /{id}/trackers   -> list_trackers
/// PUT    /{id}/trackers   -> replace_trackers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list).post(campaigns::create))
        .route(
            "/{id}",
            get(campaigns::get_by_id)
                .patch(campaigns::update)
                .delete(campaigns::delete),
        )
        .route("/{id}/status", post(campaigns::set_status))
        .route(
            "/{id}/trackers",
            get(campaigns::list_trackers).put(campaigns::replace_trackers),
        )
}
