//! College model and DTOs.

use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `colleges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct College {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub full_path: String,
    #[sqlx(try_from = "String")]
    pub status: PublicationStatus,
    pub city: Option<String>,
    pub state: Option<String>,
    pub ownership: Option<String>,
    pub established_year: Option<i32>,
    pub official_url: Option<String>,
    pub description: Option<String>,
    pub seo: serde_json::Value,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new college. The slug defaults to the name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollege {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 50))]
    pub ownership: Option<String>,
    pub established_year: Option<i32>,
    pub official_url: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    pub seo: Option<serde_json::Value>,
}

/// DTO for updating an existing college. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCollege {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 50))]
    pub ownership: Option<String>,
    pub established_year: Option<i32>,
    pub official_url: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    pub seo: Option<serde_json::Value>,
}
