// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Where unauthenticated callers are sent to obtain a token.
pub const LOGIN_URL: &str = "/api/auth/login";

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (form validation, recoverable)
    BadRequest(String),

    // 401 Unauthorized (wrong credentials, bad token)
    AuthError(String),

    // 401 Unauthorized, with a pointer to the login entry point
    LoginRequired,

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate username)
    Conflict(String),

    // 400 / 422 for a submission that was not graded; points back to the lesson
    SubmissionRejected {
        status: StatusCode,
        message: String,
        lesson_id: i64,
    },
}

/// The lesson page a submission returns to.
pub fn lesson_url(lesson_id: i64) -> String {
    format!("/api/lessons/{}", lesson_id)
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::LoginRequired => {
                let body = Json(json!({
                    "error": "Please log in to access this page.",
                    "login_url": LOGIN_URL,
                }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::SubmissionRejected {
                status,
                message,
                lesson_id,
            } => {
                let body = Json(json!({
                    "error": message,
                    "lesson_id": lesson_id,
                    "redirect_to": lesson_url(lesson_id),
                }));
                return (status, body).into_response();
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
