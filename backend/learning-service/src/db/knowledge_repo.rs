use crate::models::KnowledgePointAward;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

/// Sum of points this awarder has already given the post.
pub async fn sum_awarded<'e, E>(
    executor: E,
    post_id: Uuid,
    awarder_id: Uuid,
) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(points), 0)::BIGINT
        FROM knowledge_point_awards
        WHERE post_id = $1 AND awarder_id = $2
        "#,
    )
    .bind(post_id)
    .bind(awarder_id)
    .fetch_one(executor)
    .await
}

pub async fn insert_award(
    conn: &mut PgConnection,
    post_id: Uuid,
    awarder_id: Uuid,
    points: i32,
) -> Result<KnowledgePointAward, sqlx::Error> {
    sqlx::query_as::<_, KnowledgePointAward>(
        r#"
        WITH a AS (
            INSERT INTO knowledge_point_awards (post_id, awarder_id, points)
            VALUES ($1, $2, $3)
            RETURNING *
        )
        SELECT a.id, a.post_id, a.awarder_id, u.username AS awarder_username, a.points, a.created_at
        FROM a
        JOIN users u ON u.id = a.awarder_id
        "#,
    )
    .bind(post_id)
    .bind(awarder_id)
    .bind(points)
    .fetch_one(&mut *conn)
    .await
}

/// Add to the denormalized post total and return the new value.
pub async fn add_post_points(
    conn: &mut PgConnection,
    post_id: Uuid,
    points: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "UPDATE posts SET knowledge_points = knowledge_points + $2 WHERE id = $1 \
         RETURNING knowledge_points",
    )
    .bind(post_id)
    .bind(points)
    .fetch_one(&mut *conn)
    .await
}

pub async fn post_total(pool: &PgPool, post_id: Uuid) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "SELECT knowledge_points FROM posts WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_awards(pool: &PgPool, post_id: Uuid) -> Result<Vec<KnowledgePointAward>, sqlx::Error> {
    sqlx::query_as::<_, KnowledgePointAward>(
        r#"
        SELECT a.id, a.post_id, a.awarder_id, u.username AS awarder_username, a.points, a.created_at
        FROM knowledge_point_awards a
        JOIN users u ON u.id = a.awarder_id
        WHERE a.post_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}
