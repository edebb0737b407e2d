//! Quizzes, webinars and debates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

#[derive(Debug, Clone, FromRow)]
pub struct QuizRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub course_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub questions: Json<Vec<QuizQuestion>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question as shown to a client; the answer is only revealed to the author.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizQuestionView {
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Quiz {
    pub id: Uuid,
    pub author_id: Uuid,
    pub course_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuizQuestionView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizRecord {
    pub fn into_view(self, reveal_answers: bool) -> Quiz {
        let questions = self
            .questions
            .0
            .into_iter()
            .map(|q| QuizQuestionView {
                prompt: q.prompt,
                options: q.options,
                answer_index: reveal_answers.then_some(q.answer_index),
            })
            .collect();

        Quiz {
            id: self.id,
            author_id: self.author_id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            questions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuizRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub course_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50, message = "1-50 questions"))]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuizRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "1-50 questions"))]
    pub questions: Option<Vec<QuizQuestion>>,
}

#[derive(Debug, Deserialize)]
pub struct QuizFilter {
    pub course_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitQuizRequest {
    /// One selected option index per question, in order
    pub answers: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub answers: Vec<i32>,
    pub score: i32,
    pub total: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Webinar {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWebinarRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 1, max = 600, message = "must be 1-600 minutes"))]
    pub duration_minutes: i32,
    #[validate(url)]
    pub meeting_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWebinarRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 600, message = "must be 1-600 minutes"))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub meeting_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebinarFilter {
    /// Only webinars that have not started yet
    #[serde(default)]
    pub upcoming: bool,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DebateStatus {
    Open,
    Closed,
}

impl DebateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateStatus::Open => "open",
            DebateStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Debate {
    pub id: Uuid,
    pub author_id: Uuid,
    pub topic: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDebateRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub topic: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDebateRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub topic: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub status: Option<DebateStatus>,
}

#[derive(Debug, Deserialize)]
pub struct DebateFilter {
    pub status: Option<DebateStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
