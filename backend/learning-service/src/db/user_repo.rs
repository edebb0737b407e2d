use crate::models::{UserProfile, UserRecord};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::like_pattern;

const USER_COLUMNS: &str = "id, email, username, password_hash, display_name, bio, avatar_url, \
                            role, created_at, updated_at";

const PROFILE_SELECT: &str = r#"
    SELECT u.id, u.username, u.display_name, u.bio, u.avatar_url, u.role,
           (SELECT COUNT(*) FROM follows f WHERE f.followee_id = u.id) AS followers_count,
           (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count,
           u.created_at
    FROM users u
"#;

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    username: &str,
    password_hash: &str,
    display_name: Option<&str>,
    role: &str,
) -> Result<UserRecord, sqlx::Error> {
    let sql = format!(
        "INSERT INTO users (email, username, password_hash, display_name, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, UserRecord>(&sql)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, UserRecord>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Emails are stored lowercased, so callers pass a normalized address.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, UserRecord>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
    )
    .bind(username)
    .fetch_one(pool)
    .await
}

pub async fn user_exists<'e, E>(executor: E, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!("{PROFILE_SELECT} WHERE u.id = $1");
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Search by username/display name substring and optional role.
pub async fn search_users(
    pool: &PgPool,
    q: Option<&str>,
    role: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserProfile>, sqlx::Error> {
    let sql = format!(
        r#"{PROFILE_SELECT}
        WHERE ($1::text IS NULL OR u.username ILIKE $1 OR u.display_name ILIKE $1)
          AND ($2::text IS NULL OR u.role = $2)
        ORDER BY u.username
        LIMIT $3 OFFSET $4"#
    );
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(q.map(like_pattern))
        .bind(role)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_users(
    pool: &PgPool,
    q: Option<&str>,
    role: Option<&str>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users u
        WHERE ($1::text IS NULL OR u.username ILIKE $1 OR u.display_name ILIKE $1)
          AND ($2::text IS NULL OR u.role = $2)
        "#,
    )
    .bind(q.map(like_pattern))
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    display_name: Option<&str>,
    bio: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE users
        SET display_name = COALESCE($2, display_name),
            bio = COALESCE($3, bio),
            avatar_url = COALESCE($4, avatar_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, UserRecord>(&sql)
        .bind(user_id)
        .bind(display_name)
        .bind(bio)
        .bind(avatar_url)
        .fetch_optional(pool)
        .await
}
