/// Mentorship and tutor marketplace handlers
use crate::db::listing_repo;
use crate::error::{AppError, Result};
use crate::models::{
    CreateMentorshipRequest, CreateTutorRequest, MentorshipFilter, PageParams, Paginated,
    TutorFilter, UpdateMentorshipRequest, UpdateTutorRequest,
};
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn listing_exists() -> AppError {
    AppError::bad_request("LISTING_EXISTS", "You already have a listing of this kind")
}

fn mentorship_not_found() -> AppError {
    AppError::not_found("MENTORSHIP_NOT_FOUND", "Mentorship listing not found")
}

fn tutor_not_found() -> AppError {
    AppError::not_found("TUTOR_NOT_FOUND", "Tutor listing not found")
}

pub async fn create_mentorship(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateMentorshipRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let id = listing_repo::create_mentorship(&pool, user.user_id, &req)
        .await?
        .ok_or_else(listing_exists)?;
    let listing = listing_repo::find_mentorship(&pool, id)
        .await?
        .ok_or_else(mentorship_not_found)?;
    Ok(HttpResponse::Created().json(listing))
}

pub async fn list_mentorships(
    pool: web::Data<PgPool>,
    filter: web::Query<MentorshipFilter>,
) -> Result<HttpResponse> {
    let params = PageParams::new(filter.page, filter.limit);
    let items =
        listing_repo::list_mentorships(&pool, &filter, params.limit(), params.offset()).await?;
    let total = listing_repo::count_mentorships(&pool, &filter).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn get_mentorship(pool: web::Data<PgPool>, id: web::Path<Uuid>) -> Result<HttpResponse> {
    let listing = listing_repo::find_mentorship(&pool, *id)
        .await?
        .ok_or_else(mentorship_not_found)?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn update_mentorship(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
    req: web::Json<UpdateMentorshipRequest>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let listing = listing_repo::find_mentorship(&pool, id)
        .await?
        .ok_or_else(mentorship_not_found)?;
    user.require_owner_or_admin(listing.user_id)?;
    req.validate()?;

    listing_repo::update_mentorship(&pool, id, &req).await?;
    let updated = listing_repo::find_mentorship(&pool, id)
        .await?
        .ok_or_else(mentorship_not_found)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_mentorship(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let listing = listing_repo::find_mentorship(&pool, id)
        .await?
        .ok_or_else(mentorship_not_found)?;
    user.require_owner_or_admin(listing.user_id)?;

    listing_repo::delete_mentorship(&pool, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn create_tutor(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateTutorRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let id = listing_repo::create_tutor(&pool, user.user_id, &req)
        .await?
        .ok_or_else(listing_exists)?;
    let listing = listing_repo::find_tutor(&pool, id)
        .await?
        .ok_or_else(tutor_not_found)?;
    Ok(HttpResponse::Created().json(listing))
}

pub async fn list_tutors(
    pool: web::Data<PgPool>,
    filter: web::Query<TutorFilter>,
) -> Result<HttpResponse> {
    let params = PageParams::new(filter.page, filter.limit);
    let items = listing_repo::list_tutors(&pool, &filter, params.limit(), params.offset()).await?;
    let total = listing_repo::count_tutors(&pool, &filter).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn get_tutor(pool: web::Data<PgPool>, id: web::Path<Uuid>) -> Result<HttpResponse> {
    let listing = listing_repo::find_tutor(&pool, *id)
        .await?
        .ok_or_else(tutor_not_found)?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn update_tutor(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
    req: web::Json<UpdateTutorRequest>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let listing = listing_repo::find_tutor(&pool, id)
        .await?
        .ok_or_else(tutor_not_found)?;
    user.require_owner_or_admin(listing.user_id)?;
    req.validate()?;

    listing_repo::update_tutor(&pool, id, &req).await?;
    let updated = listing_repo::find_tutor(&pool, id)
        .await?
        .ok_or_else(tutor_not_found)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_tutor(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let listing = listing_repo::find_tutor(&pool, id)
        .await?
        .ok_or_else(tutor_not_found)?;
    user.require_owner_or_admin(listing.user_id)?;

    listing_repo::delete_tutor(&pool, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
