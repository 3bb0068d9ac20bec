// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::{AppError, ErrorResponse},
    models::quiz::{Quiz, QuizDetail, QuizFilter, QuizListParams, QuizMessage, QuizPost, QuizUpdate},
    services::QuizCatalog,
    utils::{id::parse_id, json::JsonBody},
};

/// Lists quizzes, optionally filtered by title, category or creation date.
///
/// Only one filter applies; title wins over category, which wins over date.
#[utoipa::path(
    get,
    path = "/quiz",
    tag = "quiz",
    params(QuizListParams),
    responses(
        (status = 200, description = "Quizzes, newest first", body = [Quiz]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_quizzes(
    State(catalog): State<QuizCatalog>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = catalog.list_quizzes(QuizFilter::from_params(&params)).await?;
    Ok(Json(quizzes))
}

/// Retrieves a single quiz by ID.
#[utoipa::path(
    get,
    path = "/quiz/{id}",
    tag = "quiz",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz detail", body = QuizDetail),
        (status = 400, description = "Invalid quiz id", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    )
)]
pub async fn get_quiz(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    let quiz = catalog.get_quiz(quiz_id).await?;
    Ok(Json(quiz))
}

/// Creates a new quiz. The creator is left empty.
#[utoipa::path(
    post,
    path = "/quiz/create",
    tag = "quiz",
    request_body = QuizPost,
    responses(
        (status = 201, description = "Quiz added", body = QuizMessage),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_quiz(
    State(catalog): State<QuizCatalog>,
    JsonBody(payload): JsonBody<QuizPost>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = catalog.create_quiz(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(QuizMessage {
            message: "Quiz added".to_string(),
            id,
        }),
    ))
}

/// Replaces the title and category of a quiz.
#[utoipa::path(
    patch,
    path = "/quiz/edit/{id}",
    tag = "quiz",
    params(("id" = String, Path, description = "Quiz ID")),
    request_body = QuizUpdate,
    responses(
        (status = 200, description = "Stored title and category", body = QuizUpdate),
        (status = 400, description = "Invalid quiz id or body", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    )
)]
pub async fn update_quiz(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<QuizUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    payload.validate()?;

    let updated = catalog.update_quiz(quiz_id, &payload).await?;
    Ok(Json(updated))
}

/// Deletes a quiz together with its questions and attempts.
#[utoipa::path(
    delete,
    path = "/quiz/delete/{id}",
    tag = "quiz",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz deleted", body = QuizMessage),
        (status = 400, description = "Invalid quiz id", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    )
)]
pub async fn delete_quiz(
    State(catalog): State<QuizCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    catalog.delete_quiz(quiz_id).await?;

    Ok(Json(QuizMessage {
        message: "Quiz deleted".to_string(),
        id: quiz_id,
    }))
}
