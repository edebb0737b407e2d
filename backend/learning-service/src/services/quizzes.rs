/// Quiz service - authored quizzes and graded attempts
use crate::db::quiz_repo;
use crate::error::{AppError, Result};
use crate::models::{
    CreateQuizRequest, PageParams, Paginated, Quiz, QuizAttempt, QuizFilter, QuizQuestion,
    UpdateQuizRequest,
};
use actix_middleware::AuthUser;
use sqlx::PgPool;
use uuid::Uuid;

const MIN_OPTIONS: usize = 2;
const MAX_OPTIONS: usize = 10;

/// Every question needs a prompt, 2-10 options and an answer index that points at one of them.
pub fn validate_questions(questions: &[QuizQuestion]) -> Result<()> {
    for (i, q) in questions.iter().enumerate() {
        let number = i + 1;
        if q.prompt.trim().is_empty() {
            return Err(invalid_question(format!("Question {number} has an empty prompt")));
        }
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&q.options.len())
            || q.options.iter().any(|o| o.trim().is_empty())
        {
            return Err(invalid_question(format!(
                "Question {number} needs {MIN_OPTIONS}-{MAX_OPTIONS} non-empty options"
            )));
        }
        if q.answer_index >= q.options.len() {
            return Err(invalid_question(format!(
                "Question {number} answer_index is out of range"
            )));
        }
    }
    Ok(())
}

fn invalid_question(message: String) -> AppError {
    AppError::bad_request("INVALID_QUESTIONS", message)
}

/// Count correct answers. One answer per question, in order.
pub fn grade(questions: &[QuizQuestion], answers: &[i32]) -> Result<i32> {
    if answers.len() != questions.len() {
        return Err(AppError::bad_request(
            "INVALID_ANSWERS",
            format!(
                "Expected {} answers, got {}",
                questions.len(),
                answers.len()
            ),
        ));
    }

    let score = questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| usize::try_from(**a).is_ok_and(|a| a == q.answer_index))
        .count();
    Ok(score as i32)
}

fn quiz_not_found() -> AppError {
    AppError::not_found("QUIZ_NOT_FOUND", "Quiz not found")
}

fn can_see_answers(viewer: Option<&AuthUser>, author_id: Uuid) -> bool {
    viewer.is_some_and(|v| v.user_id == author_id || v.is_admin())
}

pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_quiz(&self, author_id: Uuid, req: &CreateQuizRequest) -> Result<Quiz> {
        validate_questions(&req.questions)?;

        let record = quiz_repo::create_quiz(
            &self.pool,
            author_id,
            req.course_id,
            req.title.trim(),
            req.description.as_deref(),
            &req.questions,
        )
        .await?;
        Ok(record.into_view(true))
    }

    pub async fn get_quiz(&self, quiz_id: Uuid, viewer: Option<&AuthUser>) -> Result<Quiz> {
        let record = quiz_repo::find_quiz(&self.pool, quiz_id)
            .await?
            .ok_or_else(quiz_not_found)?;
        let reveal = can_see_answers(viewer, record.author_id);
        Ok(record.into_view(reveal))
    }

    pub async fn list_quizzes(
        &self,
        filter: &QuizFilter,
        viewer: Option<&AuthUser>,
    ) -> Result<Paginated<Quiz>> {
        let params = PageParams::new(filter.page, filter.limit);
        let records =
            quiz_repo::list_quizzes(&self.pool, filter, params.limit(), params.offset()).await?;
        let total = quiz_repo::count_quizzes(&self.pool, filter).await?;

        let items = records
            .into_iter()
            .map(|r| {
                let reveal = can_see_answers(viewer, r.author_id);
                r.into_view(reveal)
            })
            .collect();
        Ok(Paginated::new(items, params, total))
    }

    pub async fn update_quiz(
        &self,
        user: &AuthUser,
        quiz_id: Uuid,
        req: &UpdateQuizRequest,
    ) -> Result<Quiz> {
        let existing = quiz_repo::find_quiz(&self.pool, quiz_id)
            .await?
            .ok_or_else(quiz_not_found)?;
        user.require_owner_or_admin(existing.author_id)?;

        if let Some(questions) = &req.questions {
            validate_questions(questions)?;
        }

        let record = quiz_repo::update_quiz(
            &self.pool,
            quiz_id,
            req.title.as_deref().map(str::trim),
            req.description.as_deref(),
            req.questions.as_deref(),
        )
        .await?
        .ok_or_else(quiz_not_found)?;
        Ok(record.into_view(true))
    }

    pub async fn delete_quiz(&self, user: &AuthUser, quiz_id: Uuid) -> Result<()> {
        let existing = quiz_repo::find_quiz(&self.pool, quiz_id)
            .await?
            .ok_or_else(quiz_not_found)?;
        user.require_owner_or_admin(existing.author_id)?;

        quiz_repo::delete_quiz(&self.pool, quiz_id).await?;
        Ok(())
    }

    pub async fn submit_attempt(
        &self,
        quiz_id: Uuid,
        user_id: Uuid,
        answers: &[i32],
    ) -> Result<QuizAttempt> {
        let record = quiz_repo::find_quiz(&self.pool, quiz_id)
            .await?
            .ok_or_else(quiz_not_found)?;
        let questions = &record.questions.0;

        let score = grade(questions, answers)?;
        let total = questions.len() as i32;

        let attempt =
            quiz_repo::insert_attempt(&self.pool, quiz_id, user_id, answers, score, total).await?;
        tracing::info!(%quiz_id, %user_id, score, total, "quiz attempt graded");
        Ok(attempt)
    }

    pub async fn my_attempts(&self, quiz_id: Uuid, user_id: Uuid) -> Result<Vec<QuizAttempt>> {
        quiz_repo::find_quiz(&self.pool, quiz_id)
            .await?
            .ok_or_else(quiz_not_found)?;
        Ok(quiz_repo::list_attempts(&self.pool, quiz_id, user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer_index: usize) -> QuizQuestion {
        QuizQuestion {
            prompt: "Which one?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer_index,
        }
    }

    #[test]
    fn valid_questions_pass() {
        let questions = vec![question(&["a", "b"], 1), question(&["x", "y", "z"], 0)];
        assert!(validate_questions(&questions).is_ok());
    }

    #[test]
    fn answer_index_must_point_at_an_option() {
        let err = validate_questions(&[question(&["a", "b"], 2)]).unwrap_err();
        assert_eq!(err.code(), "INVALID_QUESTIONS");
    }

    #[test]
    fn single_option_question_rejected() {
        assert!(validate_questions(&[question(&["only"], 0)]).is_err());
    }

    #[test]
    fn blank_prompt_rejected() {
        let mut q = question(&["a", "b"], 0);
        q.prompt = "  ".to_string();
        assert!(validate_questions(&[q]).is_err());
    }

    #[test]
    fn grading_counts_correct_answers() {
        let questions = vec![
            question(&["a", "b"], 1),
            question(&["a", "b"], 0),
            question(&["a", "b", "c"], 2),
        ];
        assert_eq!(grade(&questions, &[1, 0, 2]).unwrap(), 3);
        assert_eq!(grade(&questions, &[0, 0, 1]).unwrap(), 1);
        assert_eq!(grade(&questions, &[-1, 5, 2]).unwrap(), 1);
    }

    #[test]
    fn grading_requires_one_answer_per_question() {
        let questions = vec![question(&["a", "b"], 1)];
        assert_eq!(grade(&questions, &[]).unwrap_err().code(), "INVALID_ANSWERS");
        assert_eq!(grade(&questions, &[1, 1]).unwrap_err().code(), "INVALID_ANSWERS");
    }
}
