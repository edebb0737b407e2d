/// Knowledge point handlers
use crate::error::Result;
use crate::models::AwardPointsRequest;
use crate::services::KnowledgePointService;
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Award points to a post (multiples of 10, at most 100 per awarder and post)
pub async fn award_points(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<AwardPointsRequest>,
) -> Result<HttpResponse> {
    let awarded = KnowledgePointService::new(pool.get_ref().clone())
        .award(*post_id, user.user_id, req.points)
        .await?;
    Ok(HttpResponse::Created().json(awarded))
}

pub async fn points_summary(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let summary = KnowledgePointService::new(pool.get_ref().clone())
        .summary(*post_id, user.map(|u| u.user_id))
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}
