use crate::models::{Course, CourseCapacity, CourseFilter, CreateCourseRequest, UpdateCourseRequest};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::like_pattern;

const COURSE_COLUMNS: &str = "id, title, description, subject, level, instructor_id, school_id, \
                              price_cents, max_students, enrolled_count, is_published, \
                              created_at, updated_at";

/// Published courses, plus the viewer's own drafts when `viewer_id` is set.
const FILTER_CLAUSE: &str = r#"
    WHERE (is_published OR instructor_id = $1)
      AND ($2::uuid IS NULL OR school_id = $2)
      AND ($3::uuid IS NULL OR instructor_id = $3)
      AND ($4::text IS NULL OR subject ILIKE $4)
      AND ($5::text IS NULL OR level = $5)
      AND ($6::text IS NULL OR title ILIKE $6 OR description ILIKE $6)
"#;

pub async fn create_course(
    pool: &PgPool,
    instructor_id: Uuid,
    req: &CreateCourseRequest,
) -> Result<Course, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO courses (title, description, subject, level, instructor_id, school_id,
                             price_cents, max_students, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COURSE_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Course>(&sql)
        .bind(req.title.trim())
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(req.subject.as_deref())
        .bind(req.level.map(|l| l.as_str()).unwrap_or("beginner"))
        .bind(instructor_id)
        .bind(req.school_id)
        .bind(req.price_cents.unwrap_or(0))
        .bind(req.max_students)
        .bind(req.is_published.unwrap_or(false))
        .fetch_one(pool)
        .await
}

pub async fn find_course(pool: &PgPool, course_id: Uuid) -> Result<Option<Course>, sqlx::Error> {
    let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
    sqlx::query_as::<_, Course>(&sql)
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_courses(
    pool: &PgPool,
    viewer_id: Option<Uuid>,
    filter: &CourseFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Course>, sqlx::Error> {
    let sql = format!(
        "SELECT {COURSE_COLUMNS} FROM courses {FILTER_CLAUSE} \
         ORDER BY created_at DESC LIMIT $7 OFFSET $8"
    );
    sqlx::query_as::<_, Course>(&sql)
        .bind(viewer_id)
        .bind(filter.school_id)
        .bind(filter.instructor_id)
        .bind(filter.subject.as_deref().map(like_pattern))
        .bind(filter.level.map(|l| l.as_str()))
        .bind(filter.q.as_deref().map(like_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_courses(
    pool: &PgPool,
    viewer_id: Option<Uuid>,
    filter: &CourseFilter,
) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM courses {FILTER_CLAUSE}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(viewer_id)
        .bind(filter.school_id)
        .bind(filter.instructor_id)
        .bind(filter.subject.as_deref().map(like_pattern))
        .bind(filter.level.map(|l| l.as_str()))
        .bind(filter.q.as_deref().map(like_pattern))
        .fetch_one(pool)
        .await
}

pub async fn update_course(
    pool: &PgPool,
    course_id: Uuid,
    req: &UpdateCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE courses
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            subject = COALESCE($4, subject),
            level = COALESCE($5, level),
            price_cents = COALESCE($6, price_cents),
            max_students = COALESCE($7, max_students),
            is_published = COALESCE($8, is_published),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COURSE_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Course>(&sql)
        .bind(course_id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(req.description.as_deref())
        .bind(req.subject.as_deref())
        .bind(req.level.map(|l| l.as_str()))
        .bind(req.price_cents)
        .bind(req.max_students)
        .bind(req.is_published)
        .fetch_optional(pool)
        .await
}

pub async fn delete_course(pool: &PgPool, course_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Lock the course row so capacity checks and the counter update are atomic.
pub async fn lock_capacity(
    conn: &mut PgConnection,
    course_id: Uuid,
) -> Result<Option<CourseCapacity>, sqlx::Error> {
    sqlx::query_as::<_, CourseCapacity>(
        "SELECT id, is_published, max_students, enrolled_count FROM courses WHERE id = $1 FOR UPDATE",
    )
    .bind(course_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn adjust_enrolled_count(
    conn: &mut PgConnection,
    course_id: Uuid,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET enrolled_count = GREATEST(enrolled_count + $2, 0) WHERE id = $1",
    )
    .bind(course_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
