use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::PageParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Article,
    Poll,
    Question,
    Media,
    StudyMaterial,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Article => "article",
            PostType::Poll => "poll",
            PostType::Question => "question",
            PostType::Media => "media",
            PostType::StudyMaterial => "study_material",
        }
    }
}

/// A post joined with its author's username and tag names.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub media_url: Option<String>,
    pub poll_options: Option<Vec<String>>,
    pub view_count: i32,
    pub comment_count: i32,
    pub reaction_count: i32,
    pub knowledge_points: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    pub post_type: PostType,
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 50000, message = "must be 1-50000 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub content: String,
    #[validate(url)]
    pub media_url: Option<String>,
    /// Required for polls (2-10 options), rejected otherwise
    pub poll_options: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    #[validate(
        length(min = 1, max = 200, message = "must be 1-200 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 50000, message = "must be 1-50000 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub content: Option<String>,
    #[validate(url)]
    pub media_url: Option<String>,
    /// Replaces the tag set when present
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostFilter {
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub author_id: Option<Uuid>,
    pub tag: Option<String>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PostFilter {
    pub fn pagination(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PollVoteRequest {
    pub option_index: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PollOptionResult {
    pub index: i32,
    pub label: String,
    pub votes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PollResults {
    pub post_id: Uuid,
    pub options: Vec<PollOptionResult>,
    pub total_votes: i64,
    pub my_vote: Option<i32>,
}
