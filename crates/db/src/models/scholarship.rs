//! Scholarship model and DTOs.

use chrono::NaiveDate;
use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `scholarships` table. Amounts are whole currency units.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scholarship {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub full_path: String,
    #[sqlx(try_from = "String")]
    pub status: PublicationStatus,
    pub provider: Option<String>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub eligibility: Option<String>,
    pub official_url: Option<String>,
    pub description: Option<String>,
    pub seo: serde_json::Value,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new scholarship. The slug defaults to the name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScholarship {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 200))]
    pub provider: Option<String>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    pub deadline: Option<NaiveDate>,
    #[validate(length(max = 5000))]
    pub eligibility: Option<String>,
    pub official_url: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    pub seo: Option<serde_json::Value>,
}

/// DTO for updating an existing scholarship. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScholarship {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 200))]
    pub provider: Option<String>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    pub deadline: Option<NaiveDate>,
    #[validate(length(max = 5000))]
    pub eligibility: Option<String>,
    pub official_url: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    pub seo: Option<serde_json::Value>,
}
