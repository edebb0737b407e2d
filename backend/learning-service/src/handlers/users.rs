/// User handlers - profiles, search and the follow graph
use crate::error::{AppError, Result};
use crate::models::{PageParams, UpdateProfileRequest, UserSearchQuery};
use crate::services::{AuthService, FollowService};
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn list_users(
    pool: web::Data<PgPool>,
    query: web::Query<UserSearchQuery>,
) -> Result<HttpResponse> {
    let page = AuthService::new(pool.get_ref().clone()).search(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_user(pool: web::Data<PgPool>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let profile = AuthService::new(pool.get_ref().clone())
        .profile(*user_id)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Self or admin
pub async fn update_user(
    pool: web::Data<PgPool>,
    user: AuthUser,
    user_id: web::Path<Uuid>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let user_id = user_id.into_inner();
    if user.user_id != user_id && !user.is_admin() {
        return Err(AppError::forbidden("You can only edit your own profile"));
    }
    req.validate()?;

    let updated = AuthService::new(pool.get_ref().clone())
        .update_profile(user_id, &req)
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn follow_user(
    pool: web::Data<PgPool>,
    user: AuthUser,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    FollowService::new(pool.get_ref().clone())
        .follow(user.user_id, *user_id)
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "following": true })))
}

pub async fn unfollow_user(
    pool: web::Data<PgPool>,
    user: AuthUser,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    FollowService::new(pool.get_ref().clone())
        .unfollow(user.user_id, *user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_followers(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let followers = FollowService::new(pool.get_ref().clone())
        .followers(*user_id, *page)
        .await?;
    Ok(HttpResponse::Ok().json(followers))
}

pub async fn list_following(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let following = FollowService::new(pool.get_ref().clone())
        .following(*user_id, *page)
        .await?;
    Ok(HttpResponse::Ok().json(following))
}
