//! Error types for the club attendance server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Numeric error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    BadValue = 18,
    NoSuchData = 20,
    NoSuchClient = 30,
    NoSuchMembership = 31,
    NoSuchAccessRule = 32,
    ClientAlreadyExists = 33,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Membership not found with id: {0}")]
    MembershipNotFound(Uuid),

    #[error("AccessRule not found with id: {0}")]
    AccessRuleNotFound(Uuid),

    #[error("Client not found with id: {0}")]
    ClientNotFound(Uuid),

    #[error("Client already exists with email: {0}")]
    ClientAlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration failed: {}", error))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::MembershipNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchMembership),
            AppError::AccessRuleNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchAccessRule),
            AppError::ClientNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchClient),
            AppError::ClientAlreadyExists(_) => (StatusCode::CONFLICT, ErrorCode::ClientAlreadyExists),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Validation(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
