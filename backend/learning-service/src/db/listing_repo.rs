//! Mentorship and tutor marketplace listings (one of each per user).

use crate::models::{
    CreateMentorshipRequest, CreateTutorRequest, Mentorship, MentorshipFilter, Tutor, TutorFilter,
    UpdateMentorshipRequest, UpdateTutorRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

const MENTORSHIP_SELECT: &str = r#"
    SELECT m.id, m.user_id, u.username, m.headline, m.bio, m.expertise, m.hourly_rate_cents,
           m.years_experience, m.is_available, m.created_at, m.updated_at
    FROM mentorships m
    JOIN users u ON u.id = m.user_id
"#;

const MENTORSHIP_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR EXISTS (
              SELECT 1 FROM unnest(m.expertise) e WHERE LOWER(e) = LOWER($1)))
      AND ($2::int IS NULL OR m.hourly_rate_cents <= $2)
      AND ($3::bool IS NULL OR m.is_available = $3)
"#;

const TUTOR_SELECT: &str = r#"
    SELECT t.id, t.user_id, u.username, t.headline, t.bio, t.subjects, t.hourly_rate_cents,
           t.is_available, t.created_at, t.updated_at
    FROM tutors t
    JOIN users u ON u.id = t.user_id
"#;

const TUTOR_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR EXISTS (
              SELECT 1 FROM unnest(t.subjects) s WHERE LOWER(s) = LOWER($1)))
      AND ($2::int IS NULL OR t.hourly_rate_cents <= $2)
      AND ($3::bool IS NULL OR t.is_available = $3)
"#;

/// Returns None when the user already has a mentorship listing.
pub async fn create_mentorship(
    pool: &PgPool,
    user_id: Uuid,
    req: &CreateMentorshipRequest,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO mentorships (user_id, headline, bio, expertise, hourly_rate_cents, years_experience)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(req.headline.trim())
    .bind(req.bio.as_deref())
    .bind(&req.expertise)
    .bind(req.hourly_rate_cents)
    .bind(req.years_experience.unwrap_or(0))
    .fetch_optional(pool)
    .await
}

pub async fn find_mentorship(pool: &PgPool, id: Uuid) -> Result<Option<Mentorship>, sqlx::Error> {
    let sql = format!("{MENTORSHIP_SELECT} WHERE m.id = $1");
    sqlx::query_as::<_, Mentorship>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_mentorships(
    pool: &PgPool,
    filter: &MentorshipFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Mentorship>, sqlx::Error> {
    let sql = format!(
        "{MENTORSHIP_SELECT} {MENTORSHIP_FILTER} \
         ORDER BY m.is_available DESC, m.created_at DESC LIMIT $4 OFFSET $5"
    );
    sqlx::query_as::<_, Mentorship>(&sql)
        .bind(filter.expertise.as_deref().map(str::trim))
        .bind(filter.max_rate_cents)
        .bind(filter.available)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_mentorships(pool: &PgPool, filter: &MentorshipFilter) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM mentorships m {MENTORSHIP_FILTER}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.expertise.as_deref().map(str::trim))
        .bind(filter.max_rate_cents)
        .bind(filter.available)
        .fetch_one(pool)
        .await
}

pub async fn update_mentorship(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateMentorshipRequest,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE mentorships
        SET headline = COALESCE($2, headline),
            bio = COALESCE($3, bio),
            expertise = COALESCE($4, expertise),
            hourly_rate_cents = COALESCE($5, hourly_rate_cents),
            years_experience = COALESCE($6, years_experience),
            is_available = COALESCE($7, is_available),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.headline.as_deref().map(str::trim))
    .bind(req.bio.as_deref())
    .bind(req.expertise.as_deref())
    .bind(req.hourly_rate_cents)
    .bind(req.years_experience)
    .bind(req.is_available)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_mentorship(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM mentorships WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns None when the user already has a tutor listing.
pub async fn create_tutor(
    pool: &PgPool,
    user_id: Uuid,
    req: &CreateTutorRequest,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO tutors (user_id, headline, bio, subjects, hourly_rate_cents)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(req.headline.trim())
    .bind(req.bio.as_deref())
    .bind(&req.subjects)
    .bind(req.hourly_rate_cents)
    .fetch_optional(pool)
    .await
}

pub async fn find_tutor(pool: &PgPool, id: Uuid) -> Result<Option<Tutor>, sqlx::Error> {
    let sql = format!("{TUTOR_SELECT} WHERE t.id = $1");
    sqlx::query_as::<_, Tutor>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_tutors(
    pool: &PgPool,
    filter: &TutorFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Tutor>, sqlx::Error> {
    let sql = format!(
        "{TUTOR_SELECT} {TUTOR_FILTER} \
         ORDER BY t.is_available DESC, t.created_at DESC LIMIT $4 OFFSET $5"
    );
    sqlx::query_as::<_, Tutor>(&sql)
        .bind(filter.subject.as_deref().map(str::trim))
        .bind(filter.max_rate_cents)
        .bind(filter.available)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_tutors(pool: &PgPool, filter: &TutorFilter) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM tutors t {TUTOR_FILTER}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.subject.as_deref().map(str::trim))
        .bind(filter.max_rate_cents)
        .bind(filter.available)
        .fetch_one(pool)
        .await
}

pub async fn update_tutor(pool: &PgPool, id: Uuid, req: &UpdateTutorRequest) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE tutors
        SET headline = COALESCE($2, headline),
            bio = COALESCE($3, bio),
            subjects = COALESCE($4, subjects),
            hourly_rate_cents = COALESCE($5, hourly_rate_cents),
            is_available = COALESCE($6, is_available),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.headline.as_deref().map(str::trim))
    .bind(req.bio.as_deref())
    .bind(req.subjects.as_deref())
    .bind(req.hourly_rate_cents)
    .bind(req.is_available)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_tutor(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tutors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
