use crate::models::{CreateSchoolRequest, School, UpdateSchoolRequest};
use sqlx::PgPool;
use uuid::Uuid;

use super::like_pattern;

const SCHOOL_COLUMNS: &str =
    "id, name, description, location, website, admin_id, created_at, updated_at";

pub async fn create_school(
    pool: &PgPool,
    admin_id: Uuid,
    req: &CreateSchoolRequest,
) -> Result<School, sqlx::Error> {
    let sql = format!(
        "INSERT INTO schools (name, description, location, website, admin_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {SCHOOL_COLUMNS}"
    );
    sqlx::query_as::<_, School>(&sql)
        .bind(req.name.trim())
        .bind(req.description.as_deref())
        .bind(req.location.as_deref())
        .bind(req.website.as_deref())
        .bind(admin_id)
        .fetch_one(pool)
        .await
}

pub async fn find_school(pool: &PgPool, school_id: Uuid) -> Result<Option<School>, sqlx::Error> {
    let sql = format!("SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1");
    sqlx::query_as::<_, School>(&sql)
        .bind(school_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_schools(
    pool: &PgPool,
    q: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<School>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {SCHOOL_COLUMNS} FROM schools
        WHERE ($1::text IS NULL OR name ILIKE $1 OR location ILIKE $1)
        ORDER BY name
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, School>(&sql)
        .bind(q.map(like_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_schools(pool: &PgPool, q: Option<&str>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM schools WHERE ($1::text IS NULL OR name ILIKE $1 OR location ILIKE $1)",
    )
    .bind(q.map(like_pattern))
    .fetch_one(pool)
    .await
}

pub async fn update_school(
    pool: &PgPool,
    school_id: Uuid,
    req: &UpdateSchoolRequest,
) -> Result<Option<School>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE schools
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            location = COALESCE($4, location),
            website = COALESCE($5, website),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {SCHOOL_COLUMNS}
        "#
    );
    sqlx::query_as::<_, School>(&sql)
        .bind(school_id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(req.description.as_deref())
        .bind(req.location.as_deref())
        .bind(req.website.as_deref())
        .fetch_optional(pool)
        .await
}

pub async fn delete_school(pool: &PgPool, school_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schools WHERE id = $1")
        .bind(school_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
