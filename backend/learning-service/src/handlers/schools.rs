/// School handlers
use crate::db::school_repo;
use crate::error::{AppError, Result};
use crate::models::{CreateSchoolRequest, PageParams, Paginated, SchoolQuery, UpdateSchoolRequest};
use actix_middleware::{AuthUser, Role};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn school_not_found() -> AppError {
    AppError::not_found("SCHOOL_NOT_FOUND", "School not found")
}

/// school_admin or admin
pub async fn create_school(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateSchoolRequest>,
) -> Result<HttpResponse> {
    user.require_any(&[Role::SchoolAdmin])?;
    req.validate()?;

    let school = school_repo::create_school(&pool, user.user_id, &req).await?;
    tracing::info!(school_id = %school.id, admin_id = %user.user_id, "school created");
    Ok(HttpResponse::Created().json(school))
}

pub async fn list_schools(
    pool: web::Data<PgPool>,
    query: web::Query<SchoolQuery>,
) -> Result<HttpResponse> {
    let params = PageParams::new(query.page, query.limit);
    let q = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let items = school_repo::list_schools(&pool, q, params.limit(), params.offset()).await?;
    let total = school_repo::count_schools(&pool, q).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn get_school(pool: web::Data<PgPool>, school_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let school = school_repo::find_school(&pool, *school_id)
        .await?
        .ok_or_else(school_not_found)?;
    Ok(HttpResponse::Ok().json(school))
}

pub async fn update_school(
    pool: web::Data<PgPool>,
    user: AuthUser,
    school_id: web::Path<Uuid>,
    req: web::Json<UpdateSchoolRequest>,
) -> Result<HttpResponse> {
    let school_id = school_id.into_inner();
    let school = school_repo::find_school(&pool, school_id)
        .await?
        .ok_or_else(school_not_found)?;
    user.require_owner_or_admin(school.admin_id)?;
    req.validate()?;

    let updated = school_repo::update_school(&pool, school_id, &req)
        .await?
        .ok_or_else(school_not_found)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_school(
    pool: web::Data<PgPool>,
    user: AuthUser,
    school_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let school_id = school_id.into_inner();
    let school = school_repo::find_school(&pool, school_id)
        .await?
        .ok_or_else(school_not_found)?;
    user.require_owner_or_admin(school.admin_id)?;

    school_repo::delete_school(&pool, school_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
