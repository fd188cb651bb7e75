//! Route definitions for the `/admin/colleges` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::colleges;
use crate::state::AppState;

/// Routes mounted at `/admin/colleges`.
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
        .route("/", get(colleges::list).post(colleges::create))
        .route("/import", post(colleges::import))
        .route(
            "/{id}",
            get(colleges::get_by_id)
                .patch(colleges::update)
                .delete(colleges::delete),
        )
        .route("/{id}/status", post(colleges::set_status))
}
