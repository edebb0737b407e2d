/// Course and enrollment handlers
use crate::error::Result;
use crate::models::{
    CourseFilter, CreateCourseRequest, PageParams, UpdateCourseRequest, UpdateProgressRequest,
};
use crate::services::CourseService;
use actix_middleware::{AuthUser, Role};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// teacher, school_admin or admin
pub async fn create_course(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse> {
    user.require_any(&[Role::Teacher, Role::SchoolAdmin])?;
    req.validate()?;

    let course = CourseService::new(pool.get_ref().clone())
        .create_course(user.user_id, &req)
        .await?;
    Ok(HttpResponse::Created().json(course))
}

pub async fn list_courses(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    filter: web::Query<CourseFilter>,
) -> Result<HttpResponse> {
    let page = CourseService::new(pool.get_ref().clone())
        .list_courses(user.map(|u| u.user_id), &filter)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_course(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    course_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let course = CourseService::new(pool.get_ref().clone())
        .get_course(*course_id, user.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

pub async fn update_course(
    pool: web::Data<PgPool>,
    user: AuthUser,
    course_id: web::Path<Uuid>,
    req: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let course = CourseService::new(pool.get_ref().clone())
        .update_course(&user, *course_id, &req)
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

pub async fn delete_course(
    pool: web::Data<PgPool>,
    user: AuthUser,
    course_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    CourseService::new(pool.get_ref().clone())
        .delete_course(&user, *course_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn enroll(
    pool: web::Data<PgPool>,
    user: AuthUser,
    course_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let enrollment = CourseService::new(pool.get_ref().clone())
        .enroll(*course_id, user.user_id)
        .await?;
    Ok(HttpResponse::Created().json(enrollment))
}

pub async fn unenroll(
    pool: web::Data<PgPool>,
    user: AuthUser,
    course_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    CourseService::new(pool.get_ref().clone())
        .unenroll(*course_id, user.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn update_progress(
    pool: web::Data<PgPool>,
    user: AuthUser,
    course_id: web::Path<Uuid>,
    req: web::Json<UpdateProgressRequest>,
) -> Result<HttpResponse> {
    let enrollment = CourseService::new(pool.get_ref().clone())
        .update_progress(*course_id, user.user_id, req.progress)
        .await?;
    Ok(HttpResponse::Ok().json(enrollment))
}

pub async fn my_enrollments(
    pool: web::Data<PgPool>,
    user: AuthUser,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let enrollments = CourseService::new(pool.get_ref().clone())
        .my_enrollments(user.user_id, *page)
        .await?;
    Ok(HttpResponse::Ok().json(enrollments))
}
