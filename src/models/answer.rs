// src/models/answer.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Question kind: true/false, multiple choice or fill-in-blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Tf,
    Mc,
    Fib,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Tf => "tf",
            QuestionType::Mc => "mc",
            QuestionType::Fib => "fib",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = AppError;

    /// Parses the value stored in `questions.type`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tf" => Ok(QuestionType::Tf),
            "mc" => Ok(QuestionType::Mc),
            "fib" => Ok(QuestionType::Fib),
            other => Err(AppError::InternalServerError(format!(
                "Unknown question type stored: {}",
                other
            ))),
        }
    }
}

/// The flat, three-column form of an answer, as it is stored in the
/// `questions` and `submission_answers` tables and exchanged over JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AnswerColumns {
    pub answer_tf: Option<bool>,
    pub correct_choice: Option<i32>,
    pub correct_answers: Option<Vec<String>>,
}

/// A correct answer key or a submitted answer, keyed by question type.
///
/// `None` inside a variant means "not set yet". It never matches anything,
/// including another `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    TrueFalse(Option<bool>),
    MultipleChoice(Option<i32>),
    FillInBlank(Option<Vec<String>>),
}

impl Answer {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Answer::TrueFalse(_) => QuestionType::Tf,
            Answer::MultipleChoice(_) => QuestionType::Mc,
            Answer::FillInBlank(_) => QuestionType::Fib,
        }
    }

    /// Decodes a client payload for a question of type `kind`.
    ///
    /// Fields belonging to the other kinds must be absent or null.
    pub fn from_columns(kind: QuestionType, columns: AnswerColumns) -> Result<Self, AppError> {
        let AnswerColumns {
            answer_tf,
            correct_choice,
            correct_answers,
        } = columns;

        let stray = match kind {
            QuestionType::Tf => correct_choice.is_some() || correct_answers.is_some(),
            QuestionType::Mc => answer_tf.is_some() || correct_answers.is_some(),
            QuestionType::Fib => answer_tf.is_some() || correct_choice.is_some(),
        };
        if stray {
            return Err(AppError::BadRequest(format!(
                "Answer fields do not match question type '{}'",
                kind
            )));
        }

        Ok(Self::select(kind, answer_tf, correct_choice, correct_answers))
    }

    /// Reads a stored row for a question of type `kind`, keeping only the
    /// column that belongs to it. Rows written before the question changed
    /// type simply end up unset.
    pub fn from_stored(kind: QuestionType, columns: &AnswerColumns) -> Self {
        Self::select(
            kind,
            columns.answer_tf,
            columns.correct_choice,
            columns.correct_answers.clone(),
        )
    }

    fn select(
        kind: QuestionType,
        answer_tf: Option<bool>,
        correct_choice: Option<i32>,
        correct_answers: Option<Vec<String>>,
    ) -> Self {
        match kind {
            QuestionType::Tf => Answer::TrueFalse(answer_tf),
            QuestionType::Mc => Answer::MultipleChoice(correct_choice),
            QuestionType::Fib => Answer::FillInBlank(correct_answers),
        }
    }

    pub fn to_columns(&self) -> AnswerColumns {
        match self {
            Answer::TrueFalse(value) => AnswerColumns {
                answer_tf: *value,
                ..Default::default()
            },
            Answer::MultipleChoice(value) => AnswerColumns {
                correct_choice: *value,
                ..Default::default()
            },
            Answer::FillInBlank(value) => AnswerColumns {
                correct_answers: value.clone(),
                ..Default::default()
            },
        }
    }

    /// Whether `submitted` satisfies this answer key.
    ///
    /// Fill-in-blank lists compare element by element: order, duplicates
    /// and case all matter.
    pub fn accepts(&self, submitted: &Answer) -> bool {
        match (self, submitted) {
            (Answer::TrueFalse(Some(key)), Answer::TrueFalse(Some(given))) => key == given,
            (Answer::MultipleChoice(Some(key)), Answer::MultipleChoice(Some(given))) => {
                key == given
            }
            (Answer::FillInBlank(Some(key)), Answer::FillInBlank(Some(given))) => key == given,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn true_false_matches_on_equal_bool() {
        let key = Answer::TrueFalse(Some(true));
        assert!(key.accepts(&Answer::TrueFalse(Some(true))));
        assert!(!key.accepts(&Answer::TrueFalse(Some(false))));
    }

    #[test]
    fn multiple_choice_matches_on_index() {
        let key = Answer::MultipleChoice(Some(1));
        assert!(key.accepts(&Answer::MultipleChoice(Some(1))));
        assert!(!key.accepts(&Answer::MultipleChoice(Some(0))));
    }

    #[test]
    fn fill_in_blank_is_exact_list_equality() {
        let key = Answer::FillInBlank(words(&["paris", "rome"]));
        assert!(key.accepts(&Answer::FillInBlank(words(&["paris", "rome"]))));
        assert!(!key.accepts(&Answer::FillInBlank(words(&["rome", "paris"]))));
        assert!(!key.accepts(&Answer::FillInBlank(words(&["Paris", "rome"]))));
        assert!(!key.accepts(&Answer::FillInBlank(words(&["paris", "rome", "rome"]))));
    }

    #[test]
    fn unset_values_never_match() {
        assert!(!Answer::TrueFalse(None).accepts(&Answer::TrueFalse(None)));
        assert!(!Answer::TrueFalse(Some(true)).accepts(&Answer::TrueFalse(None)));
        assert!(!Answer::FillInBlank(None).accepts(&Answer::FillInBlank(None)));
    }

    #[test]
    fn empty_lists_are_equal_lists() {
        let key = Answer::FillInBlank(Some(vec![]));
        assert!(key.accepts(&Answer::FillInBlank(Some(vec![]))));
    }

    #[test]
    fn different_kinds_never_match() {
        let key = Answer::MultipleChoice(Some(1));
        assert!(!key.accepts(&Answer::TrueFalse(Some(true))));
    }

    #[test]
    fn contradictory_payload_is_rejected() {
        let columns = AnswerColumns {
            answer_tf: Some(true),
            correct_choice: Some(2),
            correct_answers: None,
        };
        let err = Answer::from_columns(QuestionType::Mc, columns).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn payload_keeps_only_its_own_field() {
        let columns = AnswerColumns {
            correct_answers: words(&["paris"]),
            ..Default::default()
        };
        let answer = Answer::from_columns(QuestionType::Fib, columns).unwrap();
        assert_eq!(answer, Answer::FillInBlank(words(&["paris"])));
        assert_eq!(answer.question_type(), QuestionType::Fib);
    }

    #[test]
    fn stored_row_from_another_kind_reads_as_unset() {
        let stored = AnswerColumns {
            answer_tf: Some(true),
            ..Default::default()
        };
        assert_eq!(
            Answer::from_stored(QuestionType::Mc, &stored),
            Answer::MultipleChoice(None)
        );
    }

    #[test]
    fn columns_only_carry_the_active_field() {
        let columns = Answer::MultipleChoice(Some(3)).to_columns();
        assert_eq!(
            columns,
            AnswerColumns {
                answer_tf: None,
                correct_choice: Some(3),
                correct_answers: None,
            }
        );
    }

    #[test]
    fn question_type_round_trips_through_storage_text() {
        for kind in [QuestionType::Tf, QuestionType::Mc, QuestionType::Fib] {
            assert_eq!(kind.as_str().parse::<QuestionType>().unwrap(), kind);
        }
        assert!("essay".parse::<QuestionType>().is_err());
    }
}
