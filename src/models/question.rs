// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::answer::{Answer, AnswerColumns, QuestionType},
};

/// Raw row of the 'questions' table.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub quiz_id: Uuid,
    pub question_id: Uuid,
    pub position: i32,

    /// Mapped from the database column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    pub question_type: String,

    pub message: String,
    pub choices: Vec<String>,

    #[sqlx(flatten)]
    pub answer: AnswerColumns,
}

/// A question with its answer key decoded by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub quiz_id: Uuid,
    pub question_id: Uuid,
    pub position: i32,
    pub message: String,
    pub choices: Vec<String>,
    pub answer: Answer,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let kind: QuestionType = row.question_type.parse()?;
        Ok(Question {
            quiz_id: row.quiz_id,
            question_id: row.question_id,
            position: row.position,
            message: row.message,
            choices: row.choices,
            answer: Answer::from_stored(kind, &row.answer),
        })
    }
}

/// JSON shape of a question.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResponse {
    pub quiz_id: Uuid,
    pub question_id: Uuid,
    pub position: i32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub message: String,
    pub choices: Vec<String>,
    pub answer_tf: Option<bool>,
    pub correct_choice: Option<i32>,
    pub correct_answers: Option<Vec<String>>,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        let AnswerColumns {
            answer_tf,
            correct_choice,
            correct_answers,
        } = question.answer.to_columns();
        QuestionResponse {
            quiz_id: question.quiz_id,
            question_id: question.question_id,
            position: question.position,
            question_type: question.answer.question_type(),
            message: question.message,
            choices: question.choices,
            answer_tf,
            correct_choice,
            correct_answers,
        }
    }
}

/// DTO for editing a question. Every field is replaced; the owning quiz is not editable.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionUpdate {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub choices: Vec<String>,
    pub answer_tf: Option<bool>,
    pub correct_choice: Option<i32>,
    pub correct_answers: Option<Vec<String>>,
}

impl QuestionUpdate {
    /// The answer key, checked against the declared type.
    pub fn answer(&self) -> Result<Answer, AppError> {
        Answer::from_columns(
            self.question_type,
            AnswerColumns {
                answer_tf: self.answer_tf,
                correct_choice: self.correct_choice,
                correct_answers: self.correct_answers.clone(),
            },
        )
    }
}

/// Returned after a question is appended to a quiz.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedQuestion {
    pub question_id: Uuid,
    pub position: i32,
}
