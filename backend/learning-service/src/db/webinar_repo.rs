use crate::models::{CreateWebinarRequest, UpdateWebinarRequest, Webinar};
use sqlx::PgPool;
use uuid::Uuid;

const WEBINAR_COLUMNS: &str = "id, host_id, title, description, scheduled_at, duration_minutes, \
                               meeting_url, created_at, updated_at";

pub async fn create_webinar(
    pool: &PgPool,
    host_id: Uuid,
    req: &CreateWebinarRequest,
) -> Result<Webinar, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO webinars (host_id, title, description, scheduled_at, duration_minutes, meeting_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {WEBINAR_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Webinar>(&sql)
        .bind(host_id)
        .bind(req.title.trim())
        .bind(req.description.as_deref())
        .bind(req.scheduled_at)
        .bind(req.duration_minutes)
        .bind(req.meeting_url.as_deref())
        .fetch_one(pool)
        .await
}

pub async fn find_webinar(pool: &PgPool, id: Uuid) -> Result<Option<Webinar>, sqlx::Error> {
    let sql = format!("SELECT {WEBINAR_COLUMNS} FROM webinars WHERE id = $1");
    sqlx::query_as::<_, Webinar>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Upcoming webinars come soonest first; otherwise the latest scheduled first.
pub async fn list_webinars(
    pool: &PgPool,
    upcoming: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Webinar>, sqlx::Error> {
    let sql = if upcoming {
        format!(
            "SELECT {WEBINAR_COLUMNS} FROM webinars WHERE scheduled_at >= NOW() \
             ORDER BY scheduled_at ASC LIMIT $1 OFFSET $2"
        )
    } else {
        format!(
            "SELECT {WEBINAR_COLUMNS} FROM webinars ORDER BY scheduled_at DESC LIMIT $1 OFFSET $2"
        )
    };
    sqlx::query_as::<_, Webinar>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_webinars(pool: &PgPool, upcoming: bool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM webinars WHERE (NOT $1 OR scheduled_at >= NOW())",
    )
    .bind(upcoming)
    .fetch_one(pool)
    .await
}

pub async fn update_webinar(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateWebinarRequest,
) -> Result<Option<Webinar>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE webinars
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            scheduled_at = COALESCE($4, scheduled_at),
            duration_minutes = COALESCE($5, duration_minutes),
            meeting_url = COALESCE($6, meeting_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {WEBINAR_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Webinar>(&sql)
        .bind(id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(req.description.as_deref())
        .bind(req.scheduled_at)
        .bind(req.duration_minutes)
        .bind(req.meeting_url.as_deref())
        .fetch_optional(pool)
        .await
}

pub async fn delete_webinar(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM webinars WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
