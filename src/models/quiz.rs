// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub category: String,

    /// Not populated until creators are tracked; rendered as an empty string.
    pub creator_email: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A single quiz together with its current question count.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct QuizDetail {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub creator_email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub question_count: i64,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuizPost {
    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200 chars"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Category length must be between 1 and 200 chars"
    ))]
    pub category: String,
}

/// DTO for editing a quiz. Both fields are replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, FromRow, ToSchema)]
pub struct QuizUpdate {
    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200 chars"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Category length must be between 1 and 200 chars"
    ))]
    pub category: String,
}

/// Acknowledgement returned when a quiz is created or deleted.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizMessage {
    pub message: String,
    pub id: Uuid,
}

/// Query parameters for listing quizzes.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuizListParams {
    /// Substring of the title.
    pub title: Option<String>,
    /// Substring of the category.
    pub category: Option<String>,
    /// Substring of the creation date, rendered as "DD Month YYYY".
    pub date: Option<String>,
}

/// The one filter applied to a quiz listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizFilter {
    Title(String),
    Category(String),
    Date(String),
}

impl QuizFilter {
    /// Picks a filter from the query string. Title wins over category, which
    /// wins over date; empty values are ignored.
    pub fn from_params(params: &QuizListParams) -> Option<Self> {
        fn present(value: &Option<String>) -> Option<String> {
            value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
        }

        present(&params.title)
            .map(QuizFilter::Title)
            .or_else(|| present(&params.category).map(QuizFilter::Category))
            .or_else(|| present(&params.date).map(QuizFilter::Date))
    }

    /// SQL expression the pattern is matched against.
    pub fn column(&self) -> &'static str {
        match self {
            QuizFilter::Title(_) => "title",
            QuizFilter::Category(_) => "category",
            QuizFilter::Date(_) => "to_char(created_at, 'DD FMMonth YYYY')",
        }
    }

    /// `ILIKE` pattern for a substring match. Wildcards and backslashes in
    /// the value match themselves.
    pub fn pattern(&self) -> String {
        let value = match self {
            QuizFilter::Title(v) | QuizFilter::Category(v) | QuizFilter::Date(v) => v,
        };
        let escaped = value
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(title: Option<&str>, category: Option<&str>, date: Option<&str>) -> QuizListParams {
        QuizListParams {
            title: title.map(str::to_string),
            category: category.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn title_takes_priority_over_category() {
        let filter = QuizFilter::from_params(&params(Some("rust"), Some("science"), None));
        assert_eq!(filter, Some(QuizFilter::Title("rust".to_string())));
    }

    #[test]
    fn category_takes_priority_over_date() {
        let filter = QuizFilter::from_params(&params(None, Some("Sci"), Some("March")));
        assert_eq!(filter, Some(QuizFilter::Category("Sci".to_string())));
        assert_eq!(filter.unwrap().column(), "category");
    }

    #[test]
    fn empty_values_are_skipped() {
        let filter = QuizFilter::from_params(&params(Some(""), Some(""), Some("2025")));
        assert_eq!(filter, Some(QuizFilter::Date("2025".to_string())));
        assert!(QuizFilter::from_params(&QuizListParams::default()).is_none());
    }

    #[test]
    fn pattern_wraps_value_for_substring_match() {
        assert_eq!(QuizFilter::Category("hist".into()).pattern(), "%hist%");
    }

    #[test]
    fn pattern_escapes_like_wildcards() {
        assert_eq!(QuizFilter::Title("100%".into()).pattern(), "%100\\%%");
        assert_eq!(QuizFilter::Title("a_b".into()).pattern(), "%a\\_b%");
        assert_eq!(QuizFilter::Title("c:\\x".into()).pattern(), "%c:\\\\x%");
    }

    #[test]
    fn blank_title_fails_validation() {
        let post = QuizPost {
            title: String::new(),
            category: "General".to_string(),
        };
        assert!(post.validate().is_err());
    }
}
