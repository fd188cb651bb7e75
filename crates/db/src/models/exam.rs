//! Exam model and DTOs.

use chrono::NaiveDate;
use pagedesk_core::lifecycle::PublicationStatus;
use pagedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `exams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exam {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub full_path: String,
    #[sqlx(try_from = "String")]
    pub status: PublicationStatus,
    pub conducting_body: Option<String>,
    pub exam_level: Option<String>,
    pub registration_start: Option<NaiveDate>,
    pub registration_end: Option<NaiveDate>,
    pub exam_date: Option<NaiveDate>,
    pub official_url: Option<String>,
    pub description: Option<String>,
    pub seo: serde_json::Value,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new exam. The slug defaults to the name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExam {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 200))]
    pub conducting_body: Option<String>,
    #[validate(length(max = 100))]
    pub exam_level: Option<String>,
    pub registration_start: Option<NaiveDate>,
    pub registration_end: Option<NaiveDate>,
    pub exam_date: Option<NaiveDate>,
    pub official_url: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    pub seo: Option<serde_json::Value>,
}

/// DTO for updating an existing exam. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateExam {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 200))]
    pub conducting_body: Option<String>,
    #[validate(length(max = 100))]
    pub exam_level: Option<String>,
    pub registration_start: Option<NaiveDate>,
    pub registration_end: Option<NaiveDate>,
    pub exam_date: Option<NaiveDate>,
    pub official_url: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    pub seo: Option<serde_json::Value>,
}
