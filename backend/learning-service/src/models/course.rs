use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::PageParams;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SchoolQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: Option<String>,
    pub level: String,
    pub instructor_id: Uuid,
    pub school_id: Option<Uuid>,
    pub price_cents: i32,
    pub max_students: Option<i32>,
    pub enrolled_count: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: String,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    pub level: Option<CourseLevel>,
    pub school_id: Option<Uuid>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub price_cents: Option<i32>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub max_students: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    pub level: Option<CourseLevel>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub price_cents: Option<i32>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub max_students: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub school_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub subject: Option<String>,
    pub level: Option<CourseLevel>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl CourseFilter {
    pub fn pagination(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// Capacity fields read under a row lock while enrolling.
#[derive(Debug, Clone, FromRow)]
pub struct CourseCapacity {
    pub id: Uuid,
    pub is_published: bool,
    pub max_students: Option<i32>,
    pub enrolled_count: i32,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub progress: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Enrollment joined with the course title, for "my courses".
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrollmentWithCourse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub progress: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProgressRequest {
    pub progress: i32,
}
