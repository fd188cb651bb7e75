//! Route definitions for the `/admin/scholarships` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scholarships;
use crate::state::AppState;

/// Routes mounted at `/admin/scholarships`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// POST   /import        -> import
/// GET    /{id}          -> get_by_id
/// PATCH  /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/status   -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scholarships::list).post(scholarships::create))
        .route("/import", post(scholarships::import))
        .route(
            "/{id}",
            get(scholarships::get_by_id)
                .patch(scholarships::update)
                .delete(scholarships::delete),
        )
        .route("/{id}/status", post(scholarships::set_status))
}
