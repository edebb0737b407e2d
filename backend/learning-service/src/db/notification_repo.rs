use crate::models::{NewNotification, Notification};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, user_id, actor_id, kind, post_id, message, read_at, created_at";

/// Works with the pool or inside the transaction that caused the event.
pub async fn create_notification<'e, E>(
    executor: E,
    notification: &NewNotification,
) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, actor_id, kind, post_id, message)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(notification.user_id)
    .bind(notification.actor_id)
    .bind(notification.kind.as_str())
    .bind(notification.post_id)
    .bind(&notification.message)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn list_notifications(
    pool: &PgPool,
    user_id: Uuid,
    unread_only: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {NOTIFICATION_COLUMNS} FROM notifications
        WHERE user_id = $1 AND (NOT $2 OR read_at IS NULL)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_notifications(
    pool: &PgPool,
    user_id: Uuid,
    unread_only: bool,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND (NOT $2 OR read_at IS NULL)",
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_one(pool)
    .await
}

/// Mark one of the user's notifications read; None if it is not theirs.
pub async fn mark_read(
    pool: &PgPool,
    notification_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Notification>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE notifications SET read_at = COALESCE(read_at, NOW())
        WHERE id = $1 AND user_id = $2
        RETURNING {NOTIFICATION_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
