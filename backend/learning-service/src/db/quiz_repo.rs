use crate::models::{QuizAttempt, QuizFilter, QuizQuestion, QuizRecord};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const QUIZ_COLUMNS: &str =
    "id, author_id, course_id, title, description, questions, created_at, updated_at";

pub async fn create_quiz(
    pool: &PgPool,
    author_id: Uuid,
    course_id: Option<Uuid>,
    title: &str,
    description: Option<&str>,
    questions: &[QuizQuestion],
) -> Result<QuizRecord, sqlx::Error> {
    let sql = format!(
        "INSERT INTO quizzes (author_id, course_id, title, description, questions) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {QUIZ_COLUMNS}"
    );
    sqlx::query_as::<_, QuizRecord>(&sql)
        .bind(author_id)
        .bind(course_id)
        .bind(title)
        .bind(description)
        .bind(Json(questions))
        .fetch_one(pool)
        .await
}

pub async fn find_quiz(pool: &PgPool, quiz_id: Uuid) -> Result<Option<QuizRecord>, sqlx::Error> {
    let sql = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1");
    sqlx::query_as::<_, QuizRecord>(&sql)
        .bind(quiz_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_quizzes(
    pool: &PgPool,
    filter: &QuizFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<QuizRecord>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {QUIZ_COLUMNS} FROM quizzes
        WHERE ($1::uuid IS NULL OR course_id = $1)
          AND ($2::uuid IS NULL OR author_id = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#
    );
    sqlx::query_as::<_, QuizRecord>(&sql)
        .bind(filter.course_id)
        .bind(filter.author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_quizzes(pool: &PgPool, filter: &QuizFilter) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM quizzes
        WHERE ($1::uuid IS NULL OR course_id = $1)
          AND ($2::uuid IS NULL OR author_id = $2)
        "#,
    )
    .bind(filter.course_id)
    .bind(filter.author_id)
    .fetch_one(pool)
    .await
}

pub async fn update_quiz(
    pool: &PgPool,
    quiz_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    questions: Option<&[QuizQuestion]>,
) -> Result<Option<QuizRecord>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE quizzes
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            questions = COALESCE($4, questions),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {QUIZ_COLUMNS}
        "#
    );
    sqlx::query_as::<_, QuizRecord>(&sql)
        .bind(quiz_id)
        .bind(title)
        .bind(description)
        .bind(questions.map(Json))
        .fetch_optional(pool)
        .await
}

pub async fn delete_quiz(pool: &PgPool, quiz_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_attempt(
    pool: &PgPool,
    quiz_id: Uuid,
    user_id: Uuid,
    answers: &[i32],
    score: i32,
    total: i32,
) -> Result<QuizAttempt, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(
        r#"
        INSERT INTO quiz_attempts (quiz_id, user_id, answers, score, total)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, quiz_id, user_id, answers, score, total, created_at
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .bind(answers)
    .bind(score)
    .bind(total)
    .fetch_one(pool)
    .await
}

pub async fn list_attempts(
    pool: &PgPool,
    quiz_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(
        r#"
        SELECT id, quiz_id, user_id, answers, score, total, created_at
        FROM quiz_attempts
        WHERE quiz_id = $1 AND user_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
}
