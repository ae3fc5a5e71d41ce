//! Error handling module for the relay.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const MISSING_CREDENTIALS: &str = "MISSING_CREDENTIALS";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing client input
    BadRequest(String),
    /// One or both credential headers absent
    MissingCredentials(String),
    /// Upstream answered without the expected collection
    NotFound(String),
    /// Network, timeout, status or decoding failure on the outbound call
    Upstream(String),
    /// Invalid configuration at startup
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MissingCredentials(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::MissingCredentials(_) => codes::MISSING_CREDENTIALS,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Upstream(_) => codes::UPSTREAM_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::MissingCredentials(msg)
            | AppError::NotFound(msg)
            | AppError::Upstream(msg)
            | AppError::Config(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::error!("Upstream timeout: {:?}", err);
            return AppError::Upstream("Upstream request timed out".to_string());
        }
        tracing::error!("Upstream error: {:?}", err);
        AppError::Upstream(format!("Upstream error: {}", err))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message().to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingCredentials("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_failure_is_server_error() {
        let err = AppError::Upstream("connection refused".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), codes::UPSTREAM_ERROR);
    }

    #[test]
    fn test_error_envelope() {
        let body = ErrorResponse::new(&AppError::NotFound("Not Found".into()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Not Found");
    }

    #[test]
    fn test_display() {
        let err = AppError::BadRequest("Please provide a url".into());
        assert_eq!(err.to_string(), "BAD_REQUEST: Please provide a url");
    }
}
