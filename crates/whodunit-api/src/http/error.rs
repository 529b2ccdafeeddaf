//! Application error type mapping to HTTP status codes.
//!
//! Every handler failure is caught once here and turned into the wire
//! format the front end expects: a JSON body `{ "error": message }` with a
//! non-2xx status. No internal recovery or retry anywhere.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use whodunit_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The request named a character that is not in the cast. Rejected
    /// before any provider call.
    UnknownCharacter(String),
    /// A provider invocation failed.
    Llm(LlmError),
    /// Anything else.
    Internal(String),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::UnknownCharacter(id) => (
                StatusCode::BAD_REQUEST,
                format!("unknown character: '{id}'"),
            ),
            AppError::Llm(err @ LlmError::Configuration(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Llm(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
