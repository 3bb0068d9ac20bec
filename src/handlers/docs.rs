// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    handlers::{question, quiz, submission},
    models::{
        answer::{AnswerColumns, QuestionType},
        question::{CreatedQuestion, QuestionResponse, QuestionUpdate},
        quiz::{Quiz, QuizDetail, QuizMessage, QuizPost, QuizUpdate},
        submission::{AnswerSubmission, AttemptStarted, StatusResponse, StoredAnswer, SubmissionResult},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "quiztek", description = "Quiz catalog and attempt scoring API"),
    paths(
        quiz::list_quizzes,
        quiz::get_quiz,
        quiz::create_quiz,
        quiz::update_quiz,
        quiz::delete_quiz,
        question::list_question_ids,
        question::get_question,
        question::create_question,
        question::update_question,
        question::delete_question,
        submission::start_attempt,
        submission::submit_answer,
        submission::get_answer,
        submission::complete_attempt,
        submission::latest_submissions,
    ),
    components(schemas(
        ErrorResponse,
        Quiz,
        QuizDetail,
        QuizPost,
        QuizUpdate,
        QuizMessage,
        QuestionType,
        QuestionResponse,
        QuestionUpdate,
        CreatedQuestion,
        AnswerColumns,
        AnswerSubmission,
        StoredAnswer,
        AttemptStarted,
        SubmissionResult,
        StatusResponse,
    )),
    tags(
        (name = "quiz", description = "Quiz catalog"),
        (name = "question", description = "Questions within a quiz"),
        (name = "submission", description = "Attempts, answers and scores")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/quiz",
            "/quiz/{id}",
            "/quiz/create",
            "/quiz/edit/{id}",
            "/quiz/delete/{id}",
            "/quiz/question/{id}",
            "/question/{id}",
            "/question/create/{id}",
            "/question/edit/{id}",
            "/question/delete/{id}",
            "/submission/attempt/{id}",
            "/submission/answer/{id}",
            "/submission/{attempt_id}/{question_id}",
            "/submission/attempt/complete/{attempt_id}",
            "/submission/latest/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }
    }
}
