/// Reaction handlers
use crate::error::Result;
use crate::models::ReactRequest;
use crate::services::ReactionService;
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn react(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<ReactRequest>,
) -> Result<HttpResponse> {
    let reaction = ReactionService::new(pool.get_ref().clone())
        .react(*post_id, user.user_id, req.reaction_type)
        .await?;
    Ok(HttpResponse::Ok().json(reaction))
}

pub async fn remove_reaction(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ReactionService::new(pool.get_ref().clone())
        .remove(*post_id, user.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn reaction_summary(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let summary = ReactionService::new(pool.get_ref().clone())
        .summary(*post_id, user.map(|u| u.user_id))
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}
