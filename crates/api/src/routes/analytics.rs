//! Route definitions for `/admin/analytics`.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/admin/analytics`.
///
/// ```text
/// GET /summary  -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(analytics::summary))
}
