pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod colleges;
pub mod exams;
pub mod health;
pub mod redirects;
pub mod scholarships;
pub mod seo;
pub mod trackers;
pub mod versioned_assets;

use axum::Router;
use pagedesk_core::structure::AssetKind;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/logout                                 logout (public)
/// /auth/me                                     current user
///
/// /admin/exams                                 list, create
/// /admin/exams/import                          bulk import (POST)
/// /admin/exams/{id}                            get, update, delete
/// /admin/exams/{id}/status                     change status (POST)
/// /admin/colleges/...                          same shape as exams
/// /admin/scholarships/...                      same shape as exams
///
/// /admin/campaigns                             list, create
/// /admin/campaigns/{id}                        get, update, delete
/// /admin/campaigns/{id}/status                 change status (POST)
/// /admin/campaigns/{id}/trackers               get, replace overrides (GET, PUT)
///
/// /admin/templates                             list, create version 1
/// /admin/templates/{id}                        get, update draft, delete draft
/// /admin/templates/{id}/publish                publish (POST)
/// /admin/templates/{id}/retire                 retire (POST)
/// /admin/templates/{id}/versions               new draft version (POST)
/// /admin/templates/by-slug/{slug}/versions     version history (GET)
/// /admin/form-schemas/...                      same shape as templates
///
/// /admin/trackers                              list, create
/// /admin/trackers/resolve                      resolved injection plan (GET)
/// /admin/trackers/{id}                         get, update, delete
///
/// /admin/redirects                             list, create
/// /admin/redirects/{id}                        get, update, delete
/// /redirects/lookup                            public lookup (GET)
///
/// /admin/seo/slugs                             slug registry (GET)
/// /admin/seo/slugs/check                       path availability (GET)
/// /admin/seo/audit                             pages missing SEO fields (GET)
///
/// /admin/analytics/summary                     dashboard counts (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin/exams", exams::router())
        .nest("/admin/colleges", colleges::router())
        .nest("/admin/scholarships", scholarships::router())
        .nest("/admin/campaigns", campaigns::router())
        .nest(
            "/admin/templates",
            versioned_assets::router(AssetKind::Template),
        )
        .nest(
            "/admin/form-schemas",
            versioned_assets::router(AssetKind::FormSchema),
        )
        .nest("/admin/trackers", trackers::router())
        .nest("/admin/redirects", redirects::admin_router())
        .nest("/redirects", redirects::public_router())
        .nest("/admin/seo", seo::router())
        .nest("/admin/analytics", analytics::router())
}
