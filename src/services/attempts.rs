// src/services/attempts.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::{
    config::LATEST_SUBMISSIONS_LIMIT,
    error::{AppError, is_foreign_key_violation},
    models::{
        answer::{Answer, QuestionType},
        submission::{
            AnswerKeyRow, AnswerSubmission, AttemptState, CompletedAttempt, StoredAnswer,
            SubmissionResult,
        },
    },
    utils::time::format_completed_at,
};

/// Answer key of a quiz, by question id.
pub type AnswerKey = HashMap<Uuid, Answer>;

/// Attempt lifecycle, answer recording and scoring.
///
/// An attempt is in progress while `completed_at` is null and completed
/// once it is set. Scores are never stored; they are computed from the
/// current answer key each time the latest submissions are listed.
#[derive(Clone)]
pub struct AttemptEngine {
    pool: PgPool,
}

impl AttemptEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn start_attempt(&self, quiz_id: Uuid) -> Result<Uuid, AppError> {
        let attempt_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO submission_attempts (quiz_id) VALUES ($1) RETURNING attempt_id",
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::NotFound("Quiz not found".to_string());
            }
            storage_error("Failed to insert new attempt")(e)
        })?;

        tracing::info!("Attempt {} started for quiz {}", attempt_id, quiz_id);
        Ok(attempt_id)
    }

    /// Records the answer to one question, replacing any earlier one.
    ///
    /// The question must belong to the attempt's quiz and the attempt must
    /// still be in progress. The attempt row is share-locked so completion
    /// cannot interleave with the write.
    pub async fn submit_answer(
        &self,
        attempt_id: Uuid,
        submission: &AnswerSubmission,
    ) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to start transaction"))?;

        let attempt = sqlx::query_as::<_, AttemptState>(
            "SELECT quiz_id, completed_at FROM submission_attempts WHERE attempt_id = $1 FOR SHARE",
        )
        .bind(attempt_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to fetch attempt"))?
        .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

        if attempt.completed_at.is_some() {
            return Err(AppError::Conflict("Attempt already completed".to_string()));
        }

        let (question_quiz_id, question_type) = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT quiz_id, type FROM questions WHERE question_id = $1",
        )
        .bind(submission.question_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to fetch question"))?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

        if question_quiz_id != attempt.quiz_id {
            return Err(AppError::BadRequest(
                "Question does not belong to this attempt's quiz".to_string(),
            ));
        }

        let kind: QuestionType = question_type.parse()?;
        let columns = Answer::from_columns(kind, submission.columns())?.to_columns();

        sqlx::query(
            r#"
            INSERT INTO submission_answers (attempt_id, question_id, answer_tf, correct_choice, correct_answers)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (attempt_id, question_id) DO UPDATE
            SET answer_tf = EXCLUDED.answer_tf,
                correct_choice = EXCLUDED.correct_choice,
                correct_answers = EXCLUDED.correct_answers
            "#,
        )
        .bind(attempt_id)
        .bind(submission.question_id)
        .bind(columns.answer_tf)
        .bind(columns.correct_choice)
        .bind(columns.correct_answers)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::NotFound("Question not found".to_string());
            }
            storage_error("Failed to update answer")(e)
        })?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit transaction"))?;

        Ok(())
    }

    /// The stored answer for a pair, or `None` when nothing was submitted yet.
    pub async fn get_answer(
        &self,
        attempt_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<StoredAnswer>, AppError> {
        sqlx::query_as::<_, StoredAnswer>(
            r#"
            SELECT attempt_id, question_id, answer_tf, correct_choice, correct_answers
            FROM submission_answers
            WHERE attempt_id = $1 AND question_id = $2
            "#,
        )
        .bind(attempt_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to get answer"))
    }

    /// Stamps the attempt as completed now. Completing again moves the stamp.
    pub async fn complete_attempt(&self, attempt_id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE submission_attempts SET completed_at = NOW() WHERE attempt_id = $1")
                .bind(attempt_id)
                .execute(&self.pool)
                .await
                .map_err(storage_error("Failed to complete attempt"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Attempt not found".to_string()));
        }

        tracing::info!("Attempt {} completed", attempt_id);
        Ok(())
    }

    /// Scores the most recently completed attempts of a quiz, newest first.
    ///
    /// `total` is the number of questions the quiz has now, not when the
    /// attempt was taken. All reads share one snapshot.
    pub async fn latest_submissions(
        &self,
        quiz_id: Uuid,
    ) -> Result<Vec<SubmissionResult>, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to start transaction"))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(storage_error("Failed to set isolation level"))?;

        let attempts = sqlx::query_as::<_, CompletedAttempt>(
            r#"
            SELECT attempt_id, completed_at
            FROM submission_attempts
            WHERE quiz_id = $1
              AND completed_at IS NOT NULL
            ORDER BY completed_at DESC
            LIMIT $2
            "#,
        )
        .bind(quiz_id)
        .bind(LATEST_SUBMISSIONS_LIMIT)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_error("Failed to fetch latest submissions"))?;

        if attempts.is_empty() {
            return Ok(Vec::new());
        }

        let key_rows = sqlx::query_as::<_, AnswerKeyRow>(
            r#"
            SELECT question_id, type, answer_tf, correct_choice, correct_answers
            FROM questions
            WHERE quiz_id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_error("Failed to fetch answer key"))?;

        let attempt_ids: Vec<Uuid> = attempts.iter().map(|a| a.attempt_id).collect();
        let answers = sqlx::query_as::<_, StoredAnswer>(
            r#"
            SELECT attempt_id, question_id, answer_tf, correct_choice, correct_answers
            FROM submission_answers
            WHERE attempt_id = ANY($1)
            "#,
        )
        .bind(&attempt_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_error("Failed to fetch submitted answers"))?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit transaction"))?;

        let key = answer_key(key_rows)?;
        Ok(score_attempts(&attempts, &key, &answers))
    }
}

/// Decodes the answer-key rows of a quiz.
pub fn answer_key(rows: Vec<AnswerKeyRow>) -> Result<AnswerKey, AppError> {
    rows.into_iter()
        .map(|row| -> Result<(Uuid, Answer), AppError> {
            let kind: QuestionType = row.question_type.parse()?;
            Ok((row.question_id, Answer::from_stored(kind, &row.answer)))
        })
        .collect()
}

/// Scores each attempt against the answer key, keeping the attempts' order.
///
/// An answer counts when its question is in the key and the submitted value,
/// read as that question's type, is accepted. Answers to questions no
/// longer in the quiz are ignored.
pub fn score_attempts(
    attempts: &[CompletedAttempt],
    key: &AnswerKey,
    answers: &[StoredAnswer],
) -> Vec<SubmissionResult> {
    let total = key.len() as i64;

    let mut scores: HashMap<Uuid, i64> = HashMap::new();
    for stored in answers {
        let Some(expected) = key.get(&stored.question_id) else {
            continue;
        };
        let submitted = Answer::from_stored(expected.question_type(), &stored.answer);
        if expected.accepts(&submitted) {
            *scores.entry(stored.attempt_id).or_default() += 1;
        }
    }

    attempts
        .iter()
        .map(|attempt| SubmissionResult {
            attempt_id: attempt.attempt_id,
            completed_at: format_completed_at(attempt.completed_at),
            total,
            score: scores.get(&attempt.attempt_id).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::AnswerColumns;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        tf: Uuid,
        mc: Uuid,
        fib: Uuid,
        key: AnswerKey,
    }

    fn fixture() -> Fixture {
        let (tf, mc, fib) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let key = answer_key(vec![
            AnswerKeyRow {
                question_id: tf,
                question_type: "tf".to_string(),
                answer: AnswerColumns {
                    answer_tf: Some(true),
                    ..Default::default()
                },
            },
            AnswerKeyRow {
                question_id: mc,
                question_type: "mc".to_string(),
                answer: AnswerColumns {
                    correct_choice: Some(1),
                    ..Default::default()
                },
            },
            AnswerKeyRow {
                question_id: fib,
                question_type: "fib".to_string(),
                answer: AnswerColumns {
                    correct_answers: Some(vec!["paris".to_string()]),
                    ..Default::default()
                },
            },
        ])
        .unwrap();
        Fixture { tf, mc, fib, key }
    }

    fn attempt(minute: u32) -> CompletedAttempt {
        CompletedAttempt {
            attempt_id: Uuid::new_v4(),
            completed_at: Utc.with_ymd_and_hms(2025, 3, 7, 14, minute, 0).unwrap(),
        }
    }

    fn stored(attempt_id: Uuid, question_id: Uuid, answer: AnswerColumns) -> StoredAnswer {
        StoredAnswer {
            attempt_id,
            question_id,
            answer,
        }
    }

    fn tf(value: bool) -> AnswerColumns {
        AnswerColumns {
            answer_tf: Some(value),
            ..Default::default()
        }
    }

    fn mc(value: i32) -> AnswerColumns {
        AnswerColumns {
            correct_choice: Some(value),
            ..Default::default()
        }
    }

    fn fib(values: &[&str]) -> AnswerColumns {
        AnswerColumns {
            correct_answers: Some(values.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let f = fixture();
        let a = attempt(30);
        let answers = vec![
            stored(a.attempt_id, f.tf, tf(true)),
            stored(a.attempt_id, f.mc, mc(1)),
            stored(a.attempt_id, f.fib, fib(&["paris"])),
        ];

        let results = score_attempts(&[a.clone()], &f.key, &answers);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 3);
        assert_eq!(results[0].total, 3);
        assert_eq!(results[0].completed_at, "14:30 07 March 2025");
    }

    #[test]
    fn only_true_false_correct_scores_one() {
        let f = fixture();
        let a = attempt(0);
        let answers = vec![
            stored(a.attempt_id, f.tf, tf(true)),
            stored(a.attempt_id, f.mc, mc(0)),
            stored(a.attempt_id, f.fib, fib(&["Paris"])),
        ];

        let results = score_attempts(&[a], &f.key, &answers);
        assert_eq!(results[0].score, 1);
        assert_eq!(results[0].total, 3);
    }

    #[test]
    fn unanswered_questions_score_nothing() {
        let f = fixture();
        let a = attempt(0);
        let results = score_attempts(&[a], &f.key, &[]);
        assert_eq!(results[0].score, 0);
        assert_eq!(results[0].total, 3);
    }

    #[test]
    fn answers_stored_under_another_type_do_not_count() {
        let f = fixture();
        let a = attempt(0);
        // Answered the mc question as if it were true/false.
        let answers = vec![stored(a.attempt_id, f.mc, tf(true))];
        let results = score_attempts(&[a], &f.key, &answers);
        assert_eq!(results[0].score, 0);
    }

    #[test]
    fn answers_to_removed_questions_are_ignored() {
        let f = fixture();
        let a = attempt(0);
        let answers = vec![
            stored(a.attempt_id, Uuid::new_v4(), tf(true)),
            stored(a.attempt_id, f.tf, tf(true)),
        ];
        let results = score_attempts(&[a], &f.key, &answers);
        assert_eq!(results[0].score, 1);
    }

    #[test]
    fn scores_are_kept_per_attempt_in_given_order() {
        let f = fixture();
        let newer = attempt(50);
        let older = attempt(10);
        let answers = vec![
            stored(older.attempt_id, f.tf, tf(true)),
            stored(older.attempt_id, f.mc, mc(1)),
            stored(newer.attempt_id, f.fib, fib(&["paris"])),
        ];

        let results = score_attempts(&[newer.clone(), older.clone()], &f.key, &answers);
        assert_eq!(results[0].attempt_id, newer.attempt_id);
        assert_eq!(results[0].score, 1);
        assert_eq!(results[1].attempt_id, older.attempt_id);
        assert_eq!(results[1].score, 2);
    }

    #[test]
    fn empty_quiz_has_zero_total() {
        let a = attempt(0);
        let results = score_attempts(&[a], &AnswerKey::new(), &[]);
        assert_eq!(results[0].total, 0);
        assert_eq!(results[0].score, 0);
    }
}
