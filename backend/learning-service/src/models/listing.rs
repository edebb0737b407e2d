//! Mentorship and tutoring marketplace listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Mentorship {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub headline: String,
    pub bio: Option<String>,
    pub expertise: Vec<String>,
    pub hourly_rate_cents: i32,
    pub years_experience: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMentorshipRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub headline: String,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(max = 20, message = "at most 20 entries"))]
    pub expertise: Vec<String>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub hourly_rate_cents: i32,
    #[validate(range(min = 0, max = 80))]
    pub years_experience: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMentorshipRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub headline: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(max = 20, message = "at most 20 entries"))]
    pub expertise: Option<Vec<String>>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub hourly_rate_cents: Option<i32>,
    #[validate(range(min = 0, max = 80))]
    pub years_experience: Option<i32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MentorshipFilter {
    pub expertise: Option<String>,
    pub max_rate_cents: Option<i32>,
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Tutor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub headline: String,
    pub bio: Option<String>,
    pub subjects: Vec<String>,
    pub hourly_rate_cents: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTutorRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub headline: String,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(min = 1, max = 20, message = "1-20 subjects"))]
    pub subjects: Vec<String>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub hourly_rate_cents: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTutorRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub headline: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(min = 1, max = 20, message = "1-20 subjects"))]
    pub subjects: Option<Vec<String>>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub hourly_rate_cents: Option<i32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TutorFilter {
    pub subject: Option<String>,
    pub max_rate_cents: Option<i32>,
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
