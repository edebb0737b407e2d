use crate::models::{ConversationSummary, Message};
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, content, read_at, created_at";

pub async fn insert_message(
    pool: &PgPool,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: &str,
) -> Result<Message, sqlx::Error> {
    let sql = format!(
        "INSERT INTO messages (sender_id, recipient_id, content) VALUES ($1, $2, $3) \
         RETURNING {MESSAGE_COLUMNS}"
    );
    sqlx::query_as::<_, Message>(&sql)
        .bind(sender_id)
        .bind(recipient_id)
        .bind(content)
        .fetch_one(pool)
        .await
}

pub async fn find_message(pool: &PgPool, message_id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
    sqlx::query_as::<_, Message>(&sql)
        .bind(message_id)
        .fetch_optional(pool)
        .await
}

/// Messages exchanged between two users in either direction, newest first.
pub async fn conversation(
    pool: &PgPool,
    user_id: Uuid,
    other_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {MESSAGE_COLUMNS} FROM messages
        WHERE (sender_id = $1 AND recipient_id = $2) OR (sender_id = $2 AND recipient_id = $1)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#
    );
    sqlx::query_as::<_, Message>(&sql)
        .bind(user_id)
        .bind(other_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_conversation(
    pool: &PgPool,
    user_id: Uuid,
    other_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages
        WHERE (sender_id = $1 AND recipient_id = $2) OR (sender_id = $2 AND recipient_id = $1)
        "#,
    )
    .bind(user_id)
    .bind(other_id)
    .fetch_one(pool)
    .await
}

pub async fn conversation_summaries(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ConversationSummary>, sqlx::Error> {
    sqlx::query_as::<_, ConversationSummary>(
        r#"
        WITH mine AS (
            SELECT CASE WHEN m.sender_id = $1 THEN m.recipient_id ELSE m.sender_id END AS counterpart_id,
                   m.content, m.created_at, m.recipient_id, m.read_at
            FROM messages m
            WHERE m.sender_id = $1 OR m.recipient_id = $1
        ),
        latest AS (
            SELECT DISTINCT ON (counterpart_id) counterpart_id, content, created_at
            FROM mine
            ORDER BY counterpart_id, created_at DESC
        )
        SELECT l.counterpart_id,
               u.username AS counterpart_username,
               l.content AS last_message,
               l.created_at AS last_message_at,
               (SELECT COUNT(*) FROM mine x
                WHERE x.counterpart_id = l.counterpart_id
                  AND x.recipient_id = $1
                  AND x.read_at IS NULL) AS unread_count
        FROM latest l
        JOIN users u ON u.id = l.counterpart_id
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn mark_read(pool: &PgPool, message_id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    let sql = format!(
        "UPDATE messages SET read_at = COALESCE(read_at, NOW()) WHERE id = $1 \
         RETURNING {MESSAGE_COLUMNS}"
    );
    sqlx::query_as::<_, Message>(&sql)
        .bind(message_id)
        .fetch_optional(pool)
        .await
}

/// Mark everything `other_id` sent to `user_id` as read.
pub async fn mark_conversation_read(
    pool: &PgPool,
    user_id: Uuid,
    other_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET read_at = NOW() \
         WHERE recipient_id = $1 AND sender_id = $2 AND read_at IS NULL",
    )
    .bind(user_id)
    .bind(other_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
