//! Handler for the dashboard summary.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use pagedesk_db::models::analytics::{RedirectTotals, TrackerTotals};
use pagedesk_db::repositories::AnalyticsRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `GET /admin/analytics/summary`.
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    /// Record counts per resource, keyed by status.
    pub resources: BTreeMap<String, BTreeMap<String, i64>>,
    pub trackers: TrackerTotals,
    pub redirects: RedirectTotals,
}

/// GET /api/admin/analytics/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let counts = AnalyticsRepo::status_counts(&state.pool).await?;
    let trackers = AnalyticsRepo::tracker_totals(&state.pool).await?;
    let redirects = AnalyticsRepo::redirect_totals(&state.pool).await?;

    let mut resources: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for row in counts {
        resources
            .entry(row.resource)
            .or_default()
            .insert(row.status, row.count);
    }

    Ok(Json(DataResponse {
        data: AnalyticsSummary {
            resources,
            trackers,
            redirects,
        },
    }))
}
