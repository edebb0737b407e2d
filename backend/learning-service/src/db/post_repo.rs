use crate::models::{Post, PostFilter};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use super::like_pattern;

/// Shared projection: post columns, author username and sorted tag names.
const POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, u.username AS author_username, p.post_type, p.title,
           p.content, p.media_url, p.poll_options, p.view_count, p.comment_count,
           p.reaction_count, p.knowledge_points,
           ARRAY(
               SELECT t.name::text FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
               WHERE pt.post_id = p.id ORDER BY t.name
           ) AS tags,
           p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE p.deleted_at IS NULL
      AND ($1::text IS NULL OR p.post_type = $1)
      AND ($2::uuid IS NULL OR p.author_id = $2)
      AND ($3::text IS NULL OR EXISTS (
              SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
              WHERE pt.post_id = p.id AND t.name = $3))
      AND ($4::text IS NULL OR p.title ILIKE $4 OR p.content ILIKE $4)
"#;

/// Minimal post fields needed to authorize and validate writes.
#[derive(Debug, Clone, FromRow)]
pub struct PostRef {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_type: String,
    pub poll_options: Option<Vec<String>>,
}

pub struct NewPost<'a> {
    pub author_id: Uuid,
    pub post_type: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub media_url: Option<&'a str>,
    pub poll_options: Option<&'a [String]>,
}

pub async fn insert_post(conn: &mut PgConnection, post: NewPost<'_>) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO posts (author_id, post_type, title, content, media_url, poll_options)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(post.author_id)
    .bind(post.post_type)
    .bind(post.title)
    .bind(post.content)
    .bind(post.media_url)
    .bind(post.poll_options)
    .fetch_one(&mut *conn)
    .await
}

/// Find a post by ID (excluding soft-deleted posts)
pub async fn find_post<'e, E>(executor: E, post_id: Uuid) -> Result<Option<Post>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{POST_SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL");
    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .fetch_optional(executor)
        .await
}

pub async fn find_post_ref(pool: &PgPool, post_id: Uuid) -> Result<Option<PostRef>, sqlx::Error> {
    sqlx::query_as::<_, PostRef>(
        "SELECT id, author_id, post_type, poll_options FROM posts \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Lock a live post row for the rest of the transaction.
pub async fn lock_post(conn: &mut PgConnection, post_id: Uuid) -> Result<Option<PostRef>, sqlx::Error> {
    sqlx::query_as::<_, PostRef>(
        "SELECT id, author_id, post_type, poll_options FROM posts \
         WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
    )
    .bind(post_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Returns false when the post does not exist or is deleted.
pub async fn increment_view_count(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE posts SET view_count = view_count + 1 WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_posts(
    pool: &PgPool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        "{POST_SELECT} {FILTER_CLAUSE} ORDER BY p.created_at DESC LIMIT $5 OFFSET $6"
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(filter.post_type.map(|t| t.as_str()))
        .bind(filter.author_id)
        .bind(filter.tag.as_deref().map(normalize_tag_filter))
        .bind(filter.q.as_deref().map(like_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_posts(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM posts p {FILTER_CLAUSE}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.post_type.map(|t| t.as_str()))
        .bind(filter.author_id)
        .bind(filter.tag.as_deref().map(normalize_tag_filter))
        .bind(filter.q.as_deref().map(like_pattern))
        .fetch_one(pool)
        .await
}

fn normalize_tag_filter(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_lowercase()
}

pub async fn update_post(
    conn: &mut PgConnection,
    post_id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
    media_url: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET title = COALESCE($2, title),
            content = COALESCE($3, content),
            media_url = COALESCE($4, media_url),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .bind(title)
    .bind(content)
    .bind(media_url)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn soft_delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE posts SET deleted_at = NOW(), updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Posts by the user and everyone they follow, newest first.
pub async fn feed_posts(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        r#"{POST_SELECT}
        WHERE p.deleted_at IS NULL
          AND (p.author_id = $1
               OR p.author_id IN (SELECT followee_id FROM follows WHERE follower_id = $1))
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3"#
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_feed(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM posts p
        WHERE p.deleted_at IS NULL
          AND (p.author_id = $1
               OR p.author_id IN (SELECT followee_id FROM follows WHERE follower_id = $1))
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Posts the user bookmarked, most recently saved first.
pub async fn saved_posts(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        r#"{POST_SELECT}
        JOIN saved_posts s ON s.post_id = p.id AND s.user_id = $1
        WHERE p.deleted_at IS NULL
        ORDER BY s.created_at DESC
        LIMIT $2 OFFSET $3"#
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_saved_posts(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM saved_posts s
        JOIN posts p ON p.id = s.post_id
        WHERE s.user_id = $1 AND p.deleted_at IS NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn increment_comment_count(conn: &mut PgConnection, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Recompute `comment_count`; replies removed by cascade are not counted individually.
pub async fn recount_comments(conn: &mut PgConnection, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE posts SET comment_count = (SELECT COUNT(*) FROM comments WHERE post_id = $1) \
         WHERE id = $1",
    )
    .bind(post_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn adjust_reaction_count(
    conn: &mut PgConnection,
    post_id: Uuid,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE posts SET reaction_count = GREATEST(reaction_count + $2, 0) WHERE id = $1",
    )
    .bind(post_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Record a poll vote. Returns false when the user already voted.
pub async fn insert_poll_vote(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    option_index: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO poll_votes (post_id, user_id, option_index)
        VALUES ($1, $2, $3)
        ON CONFLICT (post_id, user_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(option_index)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// `(option_index, votes)` for options that received at least one vote.
pub async fn poll_vote_counts(pool: &PgPool, post_id: Uuid) -> Result<Vec<(i32, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (i32, i64)>(
        "SELECT option_index, COUNT(*) FROM poll_votes WHERE post_id = $1 GROUP BY option_index",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn find_poll_vote(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "SELECT option_index FROM poll_votes WHERE post_id = $1 AND user_id = $2",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
