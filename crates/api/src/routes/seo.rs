//! Route definitions for `/admin/seo`.

use axum::routing::get;
use axum::Router;

use crate::handlers::seo;
use crate::state::AppState;

/// Routes mounted at `/admin/seo`.
///
/// ```text
/// GET /slugs         -> list_slugs
/// GET /slugs/check   -> check_slug
/// GET /audit         -> audit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/slugs", get(seo::list_slugs))
        .route("/slugs/check", get(seo::check_slug))
        .route("/audit", get(seo::audit))
}
