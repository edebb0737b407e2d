/// Tag handlers
use crate::db::tag_repo;
use crate::error::{AppError, Result};
use crate::models::{CreateTagRequest, PageParams, Paginated, PostFilter, TagQuery};
use crate::services::{posts::normalize_tags, PostService};
use actix_middleware::{AuthUser, Role};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

const DEFAULT_TRENDING_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<i64>,
}

pub async fn list_tags(pool: web::Data<PgPool>, query: web::Query<TagQuery>) -> Result<HttpResponse> {
    let params = PageParams::new(query.page, query.limit);
    let prefix = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let items = tag_repo::list_tags(&pool, prefix, params.limit(), params.offset()).await?;
    let total = tag_repo::count_tags(&pool, prefix).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn trending_tags(
    pool: web::Data<PgPool>,
    query: web::Query<TrendingQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT).clamp(1, 50);
    let tags = tag_repo::trending_tags(&pool, limit).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// Admin only
pub async fn create_tag(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateTagRequest>,
) -> Result<HttpResponse> {
    user.require_any(&[Role::Admin])?;
    req.validate()?;

    let name = normalize_tags(std::slice::from_ref(&req.name))?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::bad_request("INVALID_TAG", "Tag name is required"))?;

    let tag = tag_repo::create_tag(&pool, &name)
        .await?
        .ok_or_else(|| AppError::bad_request("TAG_EXISTS", format!("Tag '{name}' already exists")))?;
    Ok(HttpResponse::Created().json(tag))
}

pub async fn posts_by_tag(
    pool: web::Data<PgPool>,
    name: web::Path<String>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let name = name.into_inner();
    let tag = tag_repo::find_by_name(&pool, &name.trim().trim_start_matches('#').to_lowercase())
        .await?
        .ok_or_else(|| AppError::not_found("TAG_NOT_FOUND", "Tag not found"))?;

    let filter = PostFilter {
        tag: Some(tag.name),
        page: page.page,
        limit: page.limit,
        ..Default::default()
    };
    let posts = PostService::new(pool.get_ref().clone())
        .list_posts(&filter)
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}
