use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::passwords::engine::{EngineError, InputError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password policy cannot be satisfied: {0}")]
    PolicyUnsatisfiable(String),
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Input(input) => input.into(),
            other @ EngineError::FallbackExhausted { .. } => {
                AppError::PolicyUnsatisfiable(other.to_string())
            }
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::PolicyUnsatisfiable(msg) => {
                tracing::error!("Policy error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "POLICY_ERROR",
                    "The configured password policy cannot be satisfied".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_bad_requests() {
        let err: AppError = EngineError::Input(InputError::Empty).into();
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "profile batch is empty");
    }

    #[test]
    fn test_not_a_sequence_message() {
        let err: AppError = InputError::NotASequence { found: "a string" }.into();
        let (_, _, message) = err.parts();
        assert_eq!(message, "profiles must be an array of objects, found a string");
    }

    #[test]
    fn test_fallback_exhausted_is_internal() {
        let err: AppError = EngineError::FallbackExhausted { attempts: 8 }.into();
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "POLICY_ERROR");
        assert!(!message.contains("attempts"));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
