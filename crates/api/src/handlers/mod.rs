pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod colleges;
pub mod content;
pub mod exams;
pub mod redirects;
pub mod scholarships;
pub mod seo;
pub mod trackers;
pub mod versioned_assets;
