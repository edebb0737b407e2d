/// Post handlers - HTTP endpoints for posts, polls, feed and bookmarks
use crate::db::{post_repo, saved_post_repo};
use crate::error::{AppError, Result};
use crate::models::{
    CreatePostRequest, PageParams, Paginated, PollVoteRequest, PostFilter, UpdatePostRequest,
};
use crate::services::PostService;
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = PostService::new(pool.get_ref().clone())
        .create_post(user.user_id, &req)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn list_posts(
    pool: web::Data<PgPool>,
    filter: web::Query<PostFilter>,
) -> Result<HttpResponse> {
    let page = PostService::new(pool.get_ref().clone())
        .list_posts(&filter)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get a post by ID (counts a view)
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = PostService::new(pool.get_ref().clone())
        .view_post(*post_id)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn update_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = PostService::new(pool.get_ref().clone())
        .update_post(&user, *post_id, &req)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    PostService::new(pool.get_ref().clone())
        .delete_post(&user, *post_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Posts from followed users plus the caller's own
pub async fn get_feed(
    pool: web::Data<PgPool>,
    user: AuthUser,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let feed = PostService::new(pool.get_ref().clone())
        .feed(user.user_id, *page)
        .await?;
    Ok(HttpResponse::Ok().json(feed))
}

pub async fn vote(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<PollVoteRequest>,
) -> Result<HttpResponse> {
    let results = PostService::new(pool.get_ref().clone())
        .vote(*post_id, user.user_id, req.option_index)
        .await?;
    Ok(HttpResponse::Created().json(results))
}

pub async fn poll_results(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let results = PostService::new(pool.get_ref().clone())
        .poll_results(*post_id, user.map(|u| u.user_id))
        .await?;
    Ok(HttpResponse::Ok().json(results))
}

pub async fn save_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    post_repo::find_post_ref(&pool, post_id)
        .await?
        .ok_or_else(|| AppError::not_found("POST_NOT_FOUND", "Post not found"))?;

    if !saved_post_repo::save_post(&pool, user.user_id, post_id).await? {
        return Err(AppError::bad_request("ALREADY_SAVED", "Post is already saved"));
    }
    Ok(HttpResponse::Created().json(serde_json::json!({ "saved": true })))
}

pub async fn unsave_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !saved_post_repo::unsave_post(&pool, user.user_id, *post_id).await? {
        return Err(AppError::not_found("NOT_SAVED", "Post is not saved"));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_saved(
    pool: web::Data<PgPool>,
    user: AuthUser,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let params = *page;
    let items =
        post_repo::saved_posts(&pool, user.user_id, params.limit(), params.offset()).await?;
    let total = post_repo::count_saved_posts(&pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}
