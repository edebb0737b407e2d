use crate::models::Reaction;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const REACTION_COLUMNS: &str = "id, post_id, user_id, reaction_type, created_at, updated_at";

pub async fn find_reaction(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Reaction>, sqlx::Error> {
    let sql = format!("SELECT {REACTION_COLUMNS} FROM reactions WHERE post_id = $1 AND user_id = $2");
    sqlx::query_as::<_, Reaction>(&sql)
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn insert_reaction(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
    reaction_type: &str,
) -> Result<Reaction, sqlx::Error> {
    let sql = format!(
        "INSERT INTO reactions (post_id, user_id, reaction_type) VALUES ($1, $2, $3) \
         RETURNING {REACTION_COLUMNS}"
    );
    sqlx::query_as::<_, Reaction>(&sql)
        .bind(post_id)
        .bind(user_id)
        .bind(reaction_type)
        .fetch_one(&mut *conn)
        .await
}

pub async fn update_reaction_type(
    conn: &mut PgConnection,
    reaction_id: Uuid,
    reaction_type: &str,
) -> Result<Reaction, sqlx::Error> {
    let sql = format!(
        "UPDATE reactions SET reaction_type = $2, updated_at = NOW() WHERE id = $1 \
         RETURNING {REACTION_COLUMNS}"
    );
    sqlx::query_as::<_, Reaction>(&sql)
        .bind(reaction_id)
        .bind(reaction_type)
        .fetch_one(&mut *conn)
        .await
}

pub async fn delete_reaction(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reactions WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// `(reaction_type, count)` for types present on the post.
pub async fn reaction_counts(pool: &PgPool, post_id: Uuid) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT reaction_type, COUNT(*) FROM reactions WHERE post_id = $1 GROUP BY reaction_type",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn find_user_reaction_type(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT reaction_type FROM reactions WHERE post_id = $1 AND user_id = $2",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
