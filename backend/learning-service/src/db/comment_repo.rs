use crate::models::Comment;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.parent_id,
           c.content, c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

pub async fn insert_comment(
    conn: &mut PgConnection,
    post_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        WITH c AS (
            INSERT INTO comments (post_id, author_id, parent_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.parent_id,
               c.content, c.created_at, c.updated_at
        FROM c
        JOIN users u ON u.id = c.author_id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(parent_id)
    .bind(content)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_comment(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let sql = format!("{COMMENT_SELECT} WHERE c.id = $1");
    sqlx::query_as::<_, Comment>(&sql)
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

/// Post the comment belongs to, used to validate reply parents.
pub async fn find_comment_post(
    conn: &mut PgConnection,
    comment_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT post_id FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_comments(
    pool: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    let sql = format!(
        "{COMMENT_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at ASC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, Comment>(&sql)
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_comments(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}

pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        WITH c AS (
            UPDATE comments SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
        )
        SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.parent_id,
               c.content, c.created_at, c.updated_at
        FROM c
        JOIN users u ON u.id = c.author_id
        "#,
    )
    .bind(comment_id)
    .bind(content)
    .fetch_optional(pool)
    .await
}

/// Delete a comment (replies cascade). Returns whether a row was removed.
pub async fn delete_comment(conn: &mut PgConnection, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
