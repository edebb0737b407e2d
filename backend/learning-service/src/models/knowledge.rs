use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct KnowledgePointAward {
    pub id: Uuid,
    pub post_id: Uuid,
    pub awarder_id: Uuid,
    pub awarder_username: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AwardPointsRequest {
    /// Multiple of 10 between 10 and 100
    pub points: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AwardPointsResponse {
    pub award: KnowledgePointAward,
    /// Post total after this award
    pub post_total: i32,
    /// Sum this awarder has given the post, including this award
    pub awarded_by_you: i64,
    pub remaining_budget: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KnowledgePointsSummary {
    pub post_id: Uuid,
    pub total_points: i32,
    pub awards: Vec<KnowledgePointAward>,
    /// Present only for authenticated viewers
    pub awarded_by_you: Option<i64>,
    pub remaining_budget: Option<i64>,
}
