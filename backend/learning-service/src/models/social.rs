use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 5000, message = "must be 1-5000 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub content: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[validate(
        length(min = 1, max = 5000, message = "must be 1-5000 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReactionType {
    Like,
    Love,
    Insightful,
    Helpful,
    Celebrate,
}

impl ReactionType {
    pub const ALL: [ReactionType; 5] = [
        ReactionType::Like,
        ReactionType::Love,
        ReactionType::Insightful,
        ReactionType::Helpful,
        ReactionType::Celebrate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "like",
            ReactionType::Love => "love",
            ReactionType::Insightful => "insightful",
            ReactionType::Helpful => "helpful",
            ReactionType::Celebrate => "celebrate",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Reaction {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReactRequest {
    pub reaction_type: ReactionType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionSummary {
    pub post_id: Uuid,
    pub total: i64,
    /// Every reaction type is present, zero when unused
    pub counts: BTreeMap<String, i64>,
    pub my_reaction: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub usage_count: i32,
    pub trending_score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagRequest {
    #[validate(
        length(min = 1, max = 50, message = "must be 1-50 characters"),
        custom(function = "crate::validators::not_blank")
    )]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    /// Name prefix
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
