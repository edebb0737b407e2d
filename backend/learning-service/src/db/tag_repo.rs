use crate::models::Tag;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::prefix_pattern;

const TAG_COLUMNS: &str = "id, name, usage_count, trending_score, created_at";

/// Get or create tags by (normalized) name in one statement.
///
/// Rows are inserted and locked in name order, so two transactions touching
/// overlapping tag sets always wait on each other in the same order.
/// `names` must not contain duplicates.
pub async fn upsert_tags(
    conn: &mut PgConnection,
    names: &[String],
) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
    sqlx::query_as::<_, (Uuid, String)>(
        r#"
        INSERT INTO tags (name)
        SELECT name FROM unnest($1::text[]) AS input(name) ORDER BY name
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name
        "#,
    )
    .bind(names)
    .fetch_all(&mut *conn)
    .await
}

/// Names of the tags currently linked to a post.
pub async fn post_tag_names(
    conn: &mut PgConnection,
    post_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT t.name FROM post_tags pt JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id = $1",
    )
    .bind(post_id)
    .fetch_all(&mut *conn)
    .await
}

/// Attach a tag to a post, bumping its counters when the link is new.
/// Returns whether a new link was created.
pub async fn attach_tag(
    conn: &mut PgConnection,
    post_id: Uuid,
    tag_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query(
        "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(post_id)
    .bind(tag_id)
    .execute(&mut *conn)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        sqlx::query(
            "UPDATE tags SET usage_count = usage_count + 1, trending_score = trending_score + 1 \
             WHERE id = $1",
        )
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(inserted)
}

/// Remove post links whose tag is not in `keep`, decrementing usage counts.
pub async fn detach_tags_except(
    conn: &mut PgConnection,
    post_id: Uuid,
    keep: &[String],
) -> Result<u64, sqlx::Error> {
    let removed = sqlx::query_scalar::<_, Uuid>(
        r#"
        DELETE FROM post_tags pt
        USING tags t
        WHERE pt.tag_id = t.id AND pt.post_id = $1 AND NOT (t.name = ANY($2))
        RETURNING pt.tag_id
        "#,
    )
    .bind(post_id)
    .bind(keep)
    .fetch_all(&mut *conn)
    .await?;

    if !removed.is_empty() {
        sqlx::query(
            "UPDATE tags SET usage_count = GREATEST(usage_count - 1, 0) WHERE id = ANY($1)",
        )
        .bind(&removed)
        .execute(&mut *conn)
        .await?;
    }

    Ok(removed.len() as u64)
}

pub async fn create_tag(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
    let sql = format!(
        "INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING RETURNING {TAG_COLUMNS}"
    );
    sqlx::query_as::<_, Tag>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
    let sql = format!("SELECT {TAG_COLUMNS} FROM tags WHERE name = $1");
    sqlx::query_as::<_, Tag>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Tags ordered by popularity, optionally restricted to a name prefix.
pub async fn list_tags(
    pool: &PgPool,
    prefix: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Tag>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {TAG_COLUMNS} FROM tags
        WHERE ($1::text IS NULL OR name LIKE $1)
        ORDER BY usage_count DESC, name
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, Tag>(&sql)
        .bind(prefix.map(|p| prefix_pattern(&p.to_lowercase())))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_tags(pool: &PgPool, prefix: Option<&str>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE ($1::text IS NULL OR name LIKE $1)")
        .bind(prefix.map(|p| prefix_pattern(&p.to_lowercase())))
        .fetch_one(pool)
        .await
}

pub async fn trending_tags(pool: &PgPool, limit: i64) -> Result<Vec<Tag>, sqlx::Error> {
    let sql = format!(
        "SELECT {TAG_COLUMNS} FROM tags ORDER BY trending_score DESC, usage_count DESC, name LIMIT $1"
    );
    sqlx::query_as::<_, Tag>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
}
