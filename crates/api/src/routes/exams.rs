//! Route definitions for the `/admin/exams` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::exams;
use crate::state::AppState;

/// Routes mounted at `/admin/exams`.
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
        .route("/", get(exams::list).post(exams::create))
        .route("/import", post(exams::import))
        .route(
            "/{id}",
            get(exams::get_by_id)
                .patch(exams::update)
                .delete(exams::delete),
        )
        .route("/{id}/status", post(exams::set_status))
}
