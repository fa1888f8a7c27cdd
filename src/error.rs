// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every failure serializes to the same envelope: `{"errors":[{"msg":…}]}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request - one message per missing/invalid field
    Validation(Vec<String>),

    // 401 Unauthorized - missing/invalid token or bad credentials
    Unauthenticated(String),

    // 403 Forbidden - authenticated but not entitled to this entry
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict - duplicate email, profile, or like
    Conflict(String),

    // 500 Internal Server Error - message already redacted by the caller
    Internal(String),
}

impl ApiError {
    pub fn validation(errors: Vec<String>) -> Self {
        ApiError::Validation(errors)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Uniform error envelope
    pub fn to_json(&self) -> Value {
        let messages: Vec<Value> = match self {
            ApiError::Validation(errors) => errors.iter().map(|m| json!({ "msg": m })).collect(),
            ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => vec![json!({ "msg": msg })],
        };
        json!({ "errors": messages })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(msg),
            other => {
                // Log the real error but never echo storage internals to clients
                tracing::error!("store error: {}", other);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "{}", errors.join(", ")),
            ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_envelope_lists_every_field_message() {
        let err = ApiError::validation(vec!["Name is Required".into(), "Email is Required".into()]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = err.to_json();
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["msg"], "Name is Required");
        assert_eq!(errors[1]["msg"], "Email is Required");
    }

    #[test]
    fn single_message_errors_use_the_same_envelope() {
        let err = ApiError::not_found("Post not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_json()["errors"][0]["msg"], "Post not found");
    }

    #[test]
    fn store_failures_are_redacted() {
        let err: ApiError = StoreError::Corrupt("password_hash leaked?".into()).into();
        match err {
            ApiError::Internal(msg) => assert!(!msg.contains("password_hash")),
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
