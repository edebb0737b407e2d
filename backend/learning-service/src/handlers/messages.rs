/// Direct message handlers
use crate::db::{message_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{PageParams, Paginated, SendMessageRequest};
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub async fn send_message(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    if req.recipient_id == user.user_id {
        return Err(AppError::bad_request(
            "CANNOT_MESSAGE_SELF",
            "You cannot send a message to yourself",
        ));
    }
    req.validate()?;

    if !user_repo::user_exists(pool.get_ref(), req.recipient_id).await? {
        return Err(AppError::not_found("USER_NOT_FOUND", "Recipient not found"));
    }

    let message =
        message_repo::insert_message(&pool, user.user_id, req.recipient_id, req.content.trim())
            .await?;
    Ok(HttpResponse::Created().json(message))
}

pub async fn list_conversations(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let summaries = message_repo::conversation_summaries(&pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(summaries))
}

/// Both directions, newest first
pub async fn get_conversation(
    pool: web::Data<PgPool>,
    user: AuthUser,
    other_id: web::Path<Uuid>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let params = *page;
    let items = message_repo::conversation(
        &pool,
        user.user_id,
        *other_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    let total = message_repo::count_conversation(&pool, user.user_id, *other_id).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

/// Recipient only
pub async fn mark_read(
    pool: web::Data<PgPool>,
    user: AuthUser,
    message_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let message_id = message_id.into_inner();
    let message = message_repo::find_message(&pool, message_id)
        .await?
        .ok_or_else(|| AppError::not_found("MESSAGE_NOT_FOUND", "Message not found"))?;

    if message.recipient_id != user.user_id {
        return Err(AppError::forbidden(
            "Only the recipient can mark a message as read",
        ));
    }

    let updated = message_repo::mark_read(&pool, message_id)
        .await?
        .ok_or_else(|| AppError::not_found("MESSAGE_NOT_FOUND", "Message not found"))?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn mark_conversation_read(
    pool: web::Data<PgPool>,
    user: AuthUser,
    other_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let updated = message_repo::mark_conversation_read(&pool, user.user_id, *other_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}
