// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, patch, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{docs, health, question, quiz, submission},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quiz, question, submission).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (managers and pool).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/create", post(quiz::create_quiz))
        .route("/{id}", get(quiz::get_quiz))
        .route("/edit/{id}", patch(quiz::update_quiz))
        .route("/delete/{id}", delete(quiz::delete_quiz))
        .route("/question/{id}", get(question::list_question_ids));

    let question_routes = Router::new()
        .route("/{id}", get(question::get_question))
        .route("/create/{id}", post(question::create_question))
        .route("/edit/{id}", patch(question::update_question))
        .route("/delete/{id}", delete(question::delete_question));

    let submission_routes = Router::new()
        .route("/attempt/{id}", post(submission::start_attempt))
        .route(
            "/attempt/complete/{attempt_id}",
            put(submission::complete_attempt),
        )
        .route("/answer/{id}", put(submission::submit_answer))
        .route("/latest/{id}", get(submission::latest_submissions))
        .route(
            "/{attempt_id}/{question_id}",
            get(submission::get_answer),
        );

    Router::new()
        .nest("/quiz", quiz_routes)
        .nest("/question", question_routes)
        .nest("/submission", submission_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/health", get(health::health))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy. No configured origins means any origin is allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Router over a pool that never connects; any storage access would fail.
    fn offline_router() -> Router {
        let config = Config {
            database_url: "postgres://quiztek@127.0.0.1:1/unreachable".to_string(),
            rust_log: "error".to_string(),
            server_port: 0,
            db_max_connections: 1,
            db_acquire_timeout_secs: 1,
            cors_origins: vec![],
        };
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy(&config.database_url)
            .unwrap();
        create_router(AppState::new(pool, config))
    }

    async fn send(method: Method, uri: &str, body: Body) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn malformed_quiz_id_is_rejected_without_storage() {
        let (status, body) = send(Method::GET, "/quiz/not-a-uuid", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid quiz id");
    }

    #[tokio::test]
    async fn malformed_question_id_on_delete_is_rejected() {
        let (status, body) = send(Method::DELETE, "/question/delete/42", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid question id");
    }

    #[tokio::test]
    async fn malformed_answer_pair_is_rejected() {
        let uri = format!("/submission/{}/nope", uuid::Uuid::new_v4());
        let (status, body) = send(Method::GET, &uri, Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid question id");
    }

    #[tokio::test]
    async fn malformed_attempt_id_on_answer_is_rejected() {
        let payload = serde_json::json!({
            "question_id": uuid::Uuid::new_v4(),
            "answer_tf": true
        });
        let (status, _) = send(
            Method::PUT,
            "/submission/answer/xyz",
            Body::from(payload.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unparsable_body_is_a_json_bad_request() {
        let (status, body) = send(Method::POST, "/quiz/create", Body::from("{\"title\": ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn body_missing_a_field_is_a_json_bad_request() {
        let payload = serde_json::json!({ "title": "History" });
        let (status, body) = send(
            Method::POST,
            "/quiz/create",
            Body::from(payload.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("category"));
    }

    #[tokio::test]
    async fn health_reports_unreachable_storage() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(Method::GET, "/api-docs/openapi.json", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/submission/latest/{id}"].is_object());
    }
}
