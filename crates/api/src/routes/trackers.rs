//! Route definitions for the `/admin/trackers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::trackers;
use crate::state::AppState;

/// Routes mounted at `/admin/trackers`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /resolve   -> resolve
/// GET    /{id}      -> get_by_id
/// PATCH  /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trackers::list).post(trackers::create))
        .route("/resolve", get(trackers::resolve))
        .route(
            "/{id}",
            get(trackers::get_by_id)
                .patch(trackers::update)
                .delete(trackers::delete),
        )
}
