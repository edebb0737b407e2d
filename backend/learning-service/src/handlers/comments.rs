/// Comment handlers
use crate::error::Result;
use crate::models::{CreateCommentRequest, PageParams, UpdateCommentRequest};
use crate::services::CommentService;
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = CommentService::new(pool.get_ref().clone())
        .create_comment(*post_id, user.user_id, req.parent_id, &req.content)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn list_comments(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let comments = CommentService::new(pool.get_ref().clone())
        .list_comments(*post_id, *page)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = CommentService::new(pool.get_ref().clone())
        .update_comment(&user, *comment_id, &req.content)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    CommentService::new(pool.get_ref().clone())
        .delete_comment(&user, *comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
