// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorResponse},
    models::{
        question::{CreatedQuestion, QuestionResponse, QuestionUpdate},
        submission::StatusResponse,
    },
    services::QuizCatalog,
    utils::{id::parse_id, json::JsonBody},
};

/// Ordered list of question IDs for a quiz.
#[utoipa::path(
    get,
    path = "/quiz/question/{id}",
    tag = "question",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Question IDs by position", body = [Uuid]),
        (status = 400, description = "Invalid quiz id", body = ErrorResponse)
    )
)]
pub async fn list_question_ids(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    let ids = catalog.question_ids(quiz_id).await?;
    Ok(Json(ids))
}

/// Retrieves a question with its answer key.
#[utoipa::path(
    get,
    path = "/question/{id}",
    tag = "question",
    params(("id" = String, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question detail", body = QuestionResponse),
        (status = 400, description = "Invalid question id", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    )
)]
pub async fn get_question(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let question_id = parse_id(&id, "question")?;
    let question = catalog.get_question(question_id).await?;
    Ok(Json(QuestionResponse::from(question)))
}

/// Appends a blank true/false question to the end of a quiz.
#[utoipa::path(
    post,
    path = "/question/create/{id}",
    tag = "question",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 201, description = "New question id and position", body = CreatedQuestion),
        (status = 400, description = "Invalid quiz id", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    )
)]
pub async fn create_question(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    let created = catalog.create_question(quiz_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces type, message, choices and answer key of a question.
#[utoipa::path(
    patch,
    path = "/question/edit/{id}",
    tag = "question",
    params(("id" = String, Path, description = "Question ID")),
    request_body = QuestionUpdate,
    responses(
        (status = 200, description = "Question updated", body = StatusResponse),
        (status = 400, description = "Invalid question id or answer fields", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    )
)]
pub async fn update_question(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<QuestionUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let question_id = parse_id(&id, "question")?;
    catalog.update_question(question_id, &payload).await?;
    Ok(Json(StatusResponse::new("success")))
}

/// Deletes a question and shifts the later ones up by one position.
#[utoipa::path(
    delete,
    path = "/question/delete/{id}",
    tag = "question",
    params(("id" = String, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question deleted", body = StatusResponse),
        (status = 400, description = "Invalid question id", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    )
)]
pub async fn delete_question(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let question_id = parse_id(&id, "question")?;
    catalog.delete_question(question_id).await?;
    Ok(Json(StatusResponse::new("deleted")))
}
