// src/services/catalog.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::storage_error;
use crate::{
    error::AppError,
    models::{
        answer::QuestionType,
        question::{CreatedQuestion, Question, QuestionRow, QuestionUpdate},
        quiz::{Quiz, QuizDetail, QuizFilter, QuizPost, QuizUpdate},
    },
};

/// CRUD over quizzes and their ordered questions.
///
/// Question positions within a quiz always form the dense sequence `1..=N`.
/// Every operation that changes the set of questions of a quiz first locks
/// the quiz row, so creates and deletes on the same quiz are serialized.
#[derive(Clone)]
pub struct QuizCatalog {
    pool: PgPool,
}

impl QuizCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists quizzes, newest first, optionally narrowed by one filter.
    pub async fn list_quizzes(&self, filter: Option<QuizFilter>) -> Result<Vec<Quiz>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT quiz_id AS id, title, category, COALESCE(creator_email, '') AS creator_email, created_at FROM quizzes",
        );

        if let Some(filter) = &filter {
            builder.push(" WHERE ");
            builder.push(filter.column());
            builder.push(" ILIKE ");
            builder.push_bind(filter.pattern());
        }
        builder.push(" ORDER BY created_at DESC");

        builder
            .build_query_as::<Quiz>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list quizzes"))
    }

    pub async fn get_quiz(&self, quiz_id: Uuid) -> Result<QuizDetail, AppError> {
        sqlx::query_as::<_, QuizDetail>(
            r#"
            SELECT
                q.quiz_id AS id,
                q.title,
                q.category,
                COALESCE(q.creator_email, '') AS creator_email,
                q.created_at,
                (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = q.quiz_id) AS question_count
            FROM quizzes q
            WHERE q.quiz_id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to fetch quiz"))?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
    }

    pub async fn create_quiz(&self, post: &QuizPost) -> Result<Uuid, AppError> {
        let quiz_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO quizzes (title, category) VALUES ($1, $2) RETURNING quiz_id",
        )
        .bind(&post.title)
        .bind(&post.category)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("Failed to create quiz"))?;

        tracing::info!("Quiz {} created", quiz_id);
        Ok(quiz_id)
    }

    /// Replaces title and category, returning the stored values.
    pub async fn update_quiz(
        &self,
        quiz_id: Uuid,
        update: &QuizUpdate,
    ) -> Result<QuizUpdate, AppError> {
        sqlx::query_as::<_, QuizUpdate>(
            "UPDATE quizzes SET title = $2, category = $3 WHERE quiz_id = $1 RETURNING title, category",
        )
        .bind(quiz_id)
        .bind(&update.title)
        .bind(&update.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to update quiz"))?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
    }

    /// Deletes a quiz. Questions, attempts and answers go with it via
    /// `ON DELETE CASCADE`.
    pub async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to delete quiz"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        tracing::info!("Quiz {} deleted", quiz_id);
        Ok(())
    }

    /// Question ids of a quiz in position order.
    pub async fn question_ids(&self, quiz_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT question_id FROM questions WHERE quiz_id = $1 ORDER BY position",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to fetch question ids"))
    }

    pub async fn get_question(&self, question_id: Uuid) -> Result<Question, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT quiz_id, question_id, position, type, message, choices,
                   answer_tf, correct_choice, correct_answers
            FROM questions
            WHERE question_id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to fetch question"))?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

        Question::try_from(row)
    }

    /// Appends an empty true/false question at the end of the quiz.
    pub async fn create_question(&self, quiz_id: Uuid) -> Result<CreatedQuestion, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to start transaction"))?;

        lock_quiz(&mut tx, quiz_id).await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error("Failed to get question count"))?;

        let position = i32::try_from(count + 1)
            .map_err(|_| AppError::BadRequest("Quiz has too many questions".to_string()))?;

        let question_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO questions (quiz_id, position, type, message)
            VALUES ($1, $2, $3, $4)
            RETURNING question_id
            "#,
        )
        .bind(quiz_id)
        .bind(position)
        .bind(QuestionType::Tf.as_str())
        .bind("")
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error("Failed to insert new question"))?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit transaction"))?;

        tracing::info!("Question {} added to quiz {} at position {}", question_id, quiz_id, position);
        Ok(CreatedQuestion {
            question_id,
            position,
        })
    }

    /// Replaces type, message, choices and the whole answer key.
    pub async fn update_question(
        &self,
        question_id: Uuid,
        update: &QuestionUpdate,
    ) -> Result<(), AppError> {
        let columns = update.answer()?.to_columns();

        let result = sqlx::query(
            r#"
            UPDATE questions
            SET type = $1,
                message = $2,
                choices = $3,
                answer_tf = $4,
                correct_choice = $5,
                correct_answers = $6
            WHERE question_id = $7
            "#,
        )
        .bind(update.question_type.as_str())
        .bind(&update.message)
        .bind(&update.choices)
        .bind(columns.answer_tf)
        .bind(columns.correct_choice)
        .bind(columns.correct_answers)
        .bind(question_id)
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to update question"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Question not found".to_string()));
        }

        Ok(())
    }

    /// Deletes a question and closes the gap it leaves in the positions.
    ///
    /// The transaction rolls back when dropped, so any early return leaves
    /// the quiz untouched.
    pub async fn delete_question(&self, question_id: Uuid) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to start transaction"))?;

        let quiz_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT quiz_id FROM questions WHERE question_id = $1",
        )
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to fetch question"))?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

        lock_quiz(&mut tx, quiz_id).await?;

        // Position is read only after the lock; a concurrent delete may have shifted it.
        let position = sqlx::query_scalar::<_, i32>(
            "DELETE FROM questions WHERE question_id = $1 RETURNING position",
        )
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to delete question"))?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

        sqlx::query(
            r#"
            UPDATE questions
            SET position = position - 1
            WHERE quiz_id = $1 AND position > $2
            "#,
        )
        .bind(quiz_id)
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(storage_error("Failed to update positions"))?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit transaction"))?;

        tracing::info!("Question {} deleted from quiz {}", question_id, quiz_id);
        Ok(())
    }
}

/// Takes the row lock that serializes question changes within one quiz.
async fn lock_quiz(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    quiz_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT quiz_id FROM quizzes WHERE quiz_id = $1 FOR UPDATE")
        .bind(quiz_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(storage_error("Failed to lock quiz"))?
        .map(|_| ())
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}
