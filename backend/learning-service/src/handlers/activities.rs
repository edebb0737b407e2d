/// Quiz, webinar and debate handlers
use crate::db::{debate_repo, webinar_repo};
use crate::error::{AppError, Result};
use crate::models::{
    CreateDebateRequest, CreateQuizRequest, CreateWebinarRequest, DebateFilter, PageParams,
    Paginated, QuizFilter, SubmitQuizRequest, UpdateDebateRequest, UpdateQuizRequest,
    UpdateWebinarRequest, WebinarFilter,
};
use crate::services::QuizService;
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

// ---- quizzes ----

pub async fn create_quiz(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let quiz = QuizService::new(pool.get_ref().clone())
        .create_quiz(user.user_id, &req)
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

pub async fn list_quizzes(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    filter: web::Query<QuizFilter>,
) -> Result<HttpResponse> {
    let page = QuizService::new(pool.get_ref().clone())
        .list_quizzes(&filter, user.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Answers are hidden unless the caller wrote the quiz
pub async fn get_quiz(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    quiz_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let quiz = QuizService::new(pool.get_ref().clone())
        .get_quiz(*quiz_id, user.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

pub async fn update_quiz(
    pool: web::Data<PgPool>,
    user: AuthUser,
    quiz_id: web::Path<Uuid>,
    req: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let quiz = QuizService::new(pool.get_ref().clone())
        .update_quiz(&user, *quiz_id, &req)
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

pub async fn delete_quiz(
    pool: web::Data<PgPool>,
    user: AuthUser,
    quiz_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    QuizService::new(pool.get_ref().clone())
        .delete_quiz(&user, *quiz_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn submit_attempt(
    pool: web::Data<PgPool>,
    user: AuthUser,
    quiz_id: web::Path<Uuid>,
    req: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse> {
    let attempt = QuizService::new(pool.get_ref().clone())
        .submit_attempt(*quiz_id, user.user_id, &req.answers)
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

pub async fn my_attempts(
    pool: web::Data<PgPool>,
    user: AuthUser,
    quiz_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let attempts = QuizService::new(pool.get_ref().clone())
        .my_attempts(*quiz_id, user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(attempts))
}

// ---- webinars ----

fn webinar_not_found() -> AppError {
    AppError::not_found("WEBINAR_NOT_FOUND", "Webinar not found")
}

pub async fn create_webinar(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateWebinarRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let webinar = webinar_repo::create_webinar(&pool, user.user_id, &req).await?;
    Ok(HttpResponse::Created().json(webinar))
}

pub async fn list_webinars(
    pool: web::Data<PgPool>,
    filter: web::Query<WebinarFilter>,
) -> Result<HttpResponse> {
    let params = PageParams::new(filter.page, filter.limit);
    let items =
        webinar_repo::list_webinars(&pool, filter.upcoming, params.limit(), params.offset())
            .await?;
    let total = webinar_repo::count_webinars(&pool, filter.upcoming).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn get_webinar(pool: web::Data<PgPool>, id: web::Path<Uuid>) -> Result<HttpResponse> {
    let webinar = webinar_repo::find_webinar(&pool, *id)
        .await?
        .ok_or_else(webinar_not_found)?;
    Ok(HttpResponse::Ok().json(webinar))
}

pub async fn update_webinar(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
    req: web::Json<UpdateWebinarRequest>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let webinar = webinar_repo::find_webinar(&pool, id)
        .await?
        .ok_or_else(webinar_not_found)?;
    user.require_owner_or_admin(webinar.host_id)?;
    req.validate()?;

    let updated = webinar_repo::update_webinar(&pool, id, &req)
        .await?
        .ok_or_else(webinar_not_found)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_webinar(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let webinar = webinar_repo::find_webinar(&pool, id)
        .await?
        .ok_or_else(webinar_not_found)?;
    user.require_owner_or_admin(webinar.host_id)?;

    webinar_repo::delete_webinar(&pool, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- debates ----

fn debate_not_found() -> AppError {
    AppError::not_found("DEBATE_NOT_FOUND", "Debate not found")
}

pub async fn create_debate(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateDebateRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let debate = debate_repo::create_debate(&pool, user.user_id, &req).await?;
    Ok(HttpResponse::Created().json(debate))
}

pub async fn list_debates(
    pool: web::Data<PgPool>,
    filter: web::Query<DebateFilter>,
) -> Result<HttpResponse> {
    let params = PageParams::new(filter.page, filter.limit);
    let items =
        debate_repo::list_debates(&pool, filter.status, params.limit(), params.offset()).await?;
    let total = debate_repo::count_debates(&pool, filter.status).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn get_debate(pool: web::Data<PgPool>, id: web::Path<Uuid>) -> Result<HttpResponse> {
    let debate = debate_repo::find_debate(&pool, *id)
        .await?
        .ok_or_else(debate_not_found)?;
    Ok(HttpResponse::Ok().json(debate))
}

pub async fn update_debate(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
    req: web::Json<UpdateDebateRequest>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let debate = debate_repo::find_debate(&pool, id)
        .await?
        .ok_or_else(debate_not_found)?;
    user.require_owner_or_admin(debate.author_id)?;
    req.validate()?;

    let updated = debate_repo::update_debate(&pool, id, &req)
        .await?
        .ok_or_else(debate_not_found)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_debate(
    pool: web::Data<PgPool>,
    user: AuthUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let debate = debate_repo::find_debate(&pool, id)
        .await?
        .ok_or_else(debate_not_found)?;
    user.require_owner_or_admin(debate.author_id)?;

    debate_repo::delete_debate(&pool, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
