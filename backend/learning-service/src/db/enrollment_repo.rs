use crate::models::{Enrollment, EnrollmentWithCourse};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const ENROLLMENT_COLUMNS: &str = "id, course_id, user_id, progress, enrolled_at, completed_at";

/// Insert an enrollment; None when the user is already enrolled.
pub async fn insert_enrollment(
    conn: &mut PgConnection,
    course_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Enrollment>, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO course_enrollments (course_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (course_id, user_id) DO NOTHING
        RETURNING {ENROLLMENT_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Enrollment>(&sql)
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn delete_enrollment(
    conn: &mut PgConnection,
    course_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_enrollments WHERE course_id = $1 AND user_id = $2")
        .bind(course_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Set progress; reaching 100 stamps `completed_at` once, dropping below clears it.
pub async fn update_progress(
    pool: &PgPool,
    course_id: Uuid,
    user_id: Uuid,
    progress: i32,
) -> Result<Option<Enrollment>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE course_enrollments
        SET progress = $3,
            completed_at = CASE WHEN $3 = 100 THEN COALESCE(completed_at, NOW()) ELSE NULL END
        WHERE course_id = $1 AND user_id = $2
        RETURNING {ENROLLMENT_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Enrollment>(&sql)
        .bind(course_id)
        .bind(user_id)
        .bind(progress)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<EnrollmentWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentWithCourse>(
        r#"
        SELECT e.id, e.course_id, c.title AS course_title, e.progress, e.enrolled_at, e.completed_at
        FROM course_enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.user_id = $1
        ORDER BY e.enrolled_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_enrollments WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
