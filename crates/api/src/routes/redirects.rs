//! Route definitions for redirects.
//!
//! Two routers are provided:
//! - `admin_router()` for redirect management mounted at `/admin/redirects`
//! - `public_router()` for the lookup used by the public site, mounted at `/redirects`

use axum::routing::get;
use axum::Router;

use crate::handlers::redirects;
use crate::state::AppState;

/// Admin routes mounted at `/admin/redirects`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(redirects::list).post(redirects::create))
        .route(
            "/{id}",
            get(redirects::get_by_id)
                .patch(redirects::update)
                .delete(redirects::delete),
        )
}

/// Public routes mounted at `/redirects`.
///
/// ```text
/// GET /lookup?path=  -> lookup
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/lookup", get(redirects::lookup))
}
