// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::answer::AnswerColumns;

/// Body of an answer submission for one question of an attempt.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnswerSubmission {
    pub question_id: Uuid,
    pub answer_tf: Option<bool>,
    pub correct_choice: Option<i32>,
    pub correct_answers: Option<Vec<String>>,
}

impl AnswerSubmission {
    pub fn columns(&self) -> AnswerColumns {
        AnswerColumns {
            answer_tf: self.answer_tf,
            correct_choice: self.correct_choice,
            correct_answers: self.correct_answers.clone(),
        }
    }
}

/// A row of 'submission_answers'.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct StoredAnswer {
    pub attempt_id: Uuid,
    pub question_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub answer: AnswerColumns,
}

/// Lifecycle columns of a 'submission_attempts' row.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptState {
    pub quiz_id: Uuid,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A completed attempt selected for scoring.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedAttempt {
    pub attempt_id: Uuid,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// Answer key of one question, as read for scoring.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerKeyRow {
    pub question_id: Uuid,
    #[sqlx(rename = "type")]
    pub question_type: String,
    #[sqlx(flatten)]
    pub answer: AnswerColumns,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttemptStarted {
    pub attempt_id: Uuid,
}

/// One entry of the latest-submissions listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmissionResult {
    pub attempt_id: Uuid,
    /// Completion time formatted as "HH:MM DD Month YYYY".
    pub completed_at: String,
    /// Questions currently in the quiz.
    pub total: i64,
    /// Answers matching the current answer key.
    pub score: i64,
}

/// Plain status acknowledgement, e.g. `{"status": "completed"}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}
