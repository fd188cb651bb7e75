//! Repository for the `campaign_trackers` override table.

use pagedesk_core::trackers::TrackerOverride;
use pagedesk_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::campaign::CampaignTracker;

/// Column list for override queries joined with `trackers t`.
const COLUMNS: &str = "ct.campaign_id, ct.tracker_id, ct.enabled, ct.priority, ct.sort_order, \
    t.name AS tracker_name, t.provider, t.load_position";

/// Provides read/replace operations for campaign tracker overrides.
pub struct CampaignTrackerRepo;

impl CampaignTrackerRepo {
    /// The campaign's overrides in their stored order.
    pub async fn list_for_campaign<'e, E: PgExecutor<'e>>(
        db: E,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignTracker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM campaign_trackers ct
             JOIN trackers t ON t.id = ct.tracker_id
             WHERE ct.campaign_id = $1
             ORDER BY ct.sort_order ASC, ct.tracker_id ASC"
        );
        sqlx::query_as::<_, CampaignTracker>(&query)
            .bind(campaign_id)
            .fetch_all(db)
            .await
    }

    /// Replace all overrides of a campaign. `sort_order` follows slice order.
    ///
    /// Run inside a transaction so readers never see a half-written list.
    pub async fn replace(
        conn: &mut PgConnection,
        campaign_id: DbId,
        overrides: &[TrackerOverride],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM campaign_trackers WHERE campaign_id = $1")
            .bind(campaign_id)
            .execute(&mut *conn)
            .await?;

        for (index, item) in overrides.iter().enumerate() {
            sqlx::query(
                "INSERT INTO campaign_trackers (campaign_id, tracker_id, enabled, priority, sort_order)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(campaign_id)
            .bind(item.tracker_id)
            .bind(item.enabled)
            .bind(item.priority)
            .bind(index as i32)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
