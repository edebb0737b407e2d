use crate::models::{CreateDebateRequest, Debate, DebateStatus, UpdateDebateRequest};
use sqlx::PgPool;
use uuid::Uuid;

const DEBATE_COLUMNS: &str = "id, author_id, topic, description, status, created_at, updated_at";

pub async fn create_debate(
    pool: &PgPool,
    author_id: Uuid,
    req: &CreateDebateRequest,
) -> Result<Debate, sqlx::Error> {
    let sql = format!(
        "INSERT INTO debates (author_id, topic, description) VALUES ($1, $2, $3) \
         RETURNING {DEBATE_COLUMNS}"
    );
    sqlx::query_as::<_, Debate>(&sql)
        .bind(author_id)
        .bind(req.topic.trim())
        .bind(req.description.as_deref())
        .fetch_one(pool)
        .await
}

pub async fn find_debate(pool: &PgPool, id: Uuid) -> Result<Option<Debate>, sqlx::Error> {
    let sql = format!("SELECT {DEBATE_COLUMNS} FROM debates WHERE id = $1");
    sqlx::query_as::<_, Debate>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_debates(
    pool: &PgPool,
    status: Option<DebateStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Debate>, sqlx::Error> {
    let sql = format!(
        "SELECT {DEBATE_COLUMNS} FROM debates WHERE ($1::text IS NULL OR status = $1) \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, Debate>(&sql)
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_debates(pool: &PgPool, status: Option<DebateStatus>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM debates WHERE ($1::text IS NULL OR status = $1)")
        .bind(status.map(|s| s.as_str()))
        .fetch_one(pool)
        .await
}

pub async fn update_debate(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateDebateRequest,
) -> Result<Option<Debate>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE debates
        SET topic = COALESCE($2, topic),
            description = COALESCE($3, description),
            status = COALESCE($4, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {DEBATE_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Debate>(&sql)
        .bind(id)
        .bind(req.topic.as_deref().map(str::trim))
        .bind(req.description.as_deref())
        .bind(req.status.map(|s| s.as_str()))
        .fetch_optional(pool)
        .await
}

pub async fn delete_debate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM debates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
