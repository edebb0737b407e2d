/// Notification handlers
use crate::db::notification_repo;
use crate::error::{AppError, Result};
use crate::models::{NotificationQuery, PageParams, Paginated};
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_notifications(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    let params = PageParams::new(query.page, query.limit);
    let items = notification_repo::list_notifications(
        &pool,
        user.user_id,
        query.unread_only,
        params.limit(),
        params.offset(),
    )
    .await?;
    let total = notification_repo::count_notifications(&pool, user.user_id, query.unread_only).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(items, params, total)))
}

pub async fn mark_read(
    pool: web::Data<PgPool>,
    user: AuthUser,
    notification_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let notification = notification_repo::mark_read(&pool, *notification_id, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("NOTIFICATION_NOT_FOUND", "Notification not found"))?;
    Ok(HttpResponse::Ok().json(notification))
}

pub async fn mark_all_read(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let updated = notification_repo::mark_all_read(&pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}
