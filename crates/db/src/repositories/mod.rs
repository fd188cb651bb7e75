//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Methods
//! that run a single statement are generic over [`sqlx::PgExecutor`] so the
//! API layer can call them with either `&PgPool` or an open transaction
//! (`&mut *tx`).

pub mod analytics_repo;
pub mod campaign_repo;
pub mod campaign_tracker_repo;
pub mod college_repo;
pub mod exam_repo;
pub mod redirect_repo;
pub mod scholarship_repo;
pub mod slug_repo;
pub mod tracker_repo;
pub mod user_repo;
pub mod versioned_asset_repo;

pub use analytics_repo::AnalyticsRepo;
pub use campaign_repo::CampaignRepo;
pub use campaign_tracker_repo::CampaignTrackerRepo;
pub use college_repo::CollegeRepo;
pub use exam_repo::ExamRepo;
pub use redirect_repo::RedirectRepo;
pub use scholarship_repo::ScholarshipRepo;
pub use slug_repo::SlugRepo;
pub use tracker_repo::TrackerRepo;
pub use user_repo::UserRepo;
pub use versioned_asset_repo::VersionedAssetRepo;
