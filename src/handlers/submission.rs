// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, ErrorResponse},
    models::submission::{
        AnswerSubmission, AttemptStarted, StatusResponse, StoredAnswer, SubmissionResult,
    },
    services::AttemptEngine,
    utils::{id::parse_id, json::JsonBody},
};

/// Starts a new attempt at a quiz.
#[utoipa::path(
    post,
    path = "/submission/attempt/{id}",
    tag = "submission",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Attempt started", body = AttemptStarted),
        (status = 400, description = "Invalid quiz id", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    )
)]
pub async fn start_attempt(
    State(engine): State<AttemptEngine>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    let attempt_id = engine.start_attempt(quiz_id).await?;
    Ok(Json(AttemptStarted { attempt_id }))
}

/// Records or replaces the answer to one question of an attempt.
#[utoipa::path(
    put,
    path = "/submission/answer/{id}",
    tag = "submission",
    params(("id" = String, Path, description = "Attempt ID")),
    request_body = AnswerSubmission,
    responses(
        (status = 200, description = "Answer stored", body = StatusResponse),
        (status = 400, description = "Invalid id, answer fields, or question of another quiz", body = ErrorResponse),
        (status = 404, description = "Attempt or question not found", body = ErrorResponse),
        (status = 409, description = "Attempt already completed", body = ErrorResponse)
    )
)]
pub async fn submit_answer(
    State(engine): State<AttemptEngine>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AnswerSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let attempt_id = parse_id(&id, "attempt")?;
    engine.submit_answer(attempt_id, &payload).await?;
    Ok(Json(StatusResponse::new("success")))
}

/// Returns the submitted answer, or an empty object when there is none yet.
#[utoipa::path(
    get,
    path = "/submission/{attempt_id}/{question_id}",
    tag = "submission",
    params(
        ("attempt_id" = String, Path, description = "Attempt ID"),
        ("question_id" = String, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Stored answer or {}", body = StoredAnswer),
        (status = 400, description = "Invalid id", body = ErrorResponse)
    )
)]
pub async fn get_answer(
    State(engine): State<AttemptEngine>,
    Path((attempt_id, question_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let attempt_id = parse_id(&attempt_id, "attempt")?;
    let question_id = parse_id(&question_id, "question")?;

    let response = match engine.get_answer(attempt_id, question_id).await? {
        Some(answer) => Json(answer).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    };
    Ok(response)
}

/// Marks an attempt as completed.
#[utoipa::path(
    put,
    path = "/submission/attempt/complete/{attempt_id}",
    tag = "submission",
    params(("attempt_id" = String, Path, description = "Attempt ID")),
    responses(
        (status = 200, description = "Attempt completed", body = StatusResponse),
        (status = 400, description = "Invalid attempt id", body = ErrorResponse),
        (status = 404, description = "Attempt not found", body = ErrorResponse)
    )
)]
pub async fn complete_attempt(
    State(engine): State<AttemptEngine>,
    Path(attempt_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let attempt_id = parse_id(&attempt_id, "attempt")?;
    engine.complete_attempt(attempt_id).await?;
    Ok(Json(StatusResponse::new("completed")))
}

/// Scores of the five most recently completed attempts of a quiz.
#[utoipa::path(
    get,
    path = "/submission/latest/{id}",
    tag = "submission",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Newest first", body = [SubmissionResult]),
        (status = 400, description = "Invalid quiz id", body = ErrorResponse)
    )
)]
pub async fn latest_submissions(
    State(engine): State<AttemptEngine>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id(&id, "quiz")?;
    let results = engine.latest_submissions(quiz_id).await?;
    Ok(Json(results))
}
