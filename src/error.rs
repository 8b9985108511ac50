//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` returned by every HTTP handler.
//! It is the single place where domain failures are turned into status codes and
//! `{"error": ...}` JSON bodies.
//!
//! `AppError` implements `actix_web::error::ResponseError`. `From` implementations for
//! `AuthError`, `sqlx::Error` and `validator::ValidationErrors` let handlers use `?`
//! directly on store, session and validation results.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::config::ConfigError;

/// Represents all possible errors that can reach an HTTP client.
///
/// Each variant carries the message shown to the client, except the two
/// server-side variants whose details are only logged.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed or rejected request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The requested resource does not exist for this caller (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Storage failure (HTTP 500). Wraps errors from `sqlx`.
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input failed `validator` rules (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                "Database error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Maps session failures onto their HTTP outcome.
///
/// Every token verification failure reaches the client as the same 401 message.
impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::InvalidCredentials => {
                AppError::BadRequest("Incorrect username or password".into())
            }
            AuthError::UserExists => AppError::BadRequest("User already exists".into()),
            AuthError::Unauthorized => AppError::Unauthorized("Invalid token".into()),
            AuthError::WrongTokenType => AppError::BadRequest("Invalid token type".into()),
            AuthError::UserNotFound => AppError::NotFound("User not found".into()),
            AuthError::Hash(msg) => AppError::InternalServerError(msg),
            AuthError::Token(err) => AppError::InternalServerError(err.to_string()),
            AuthError::Storage(err) => AppError::from(err),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("auth setup error: {0}")]
    Auth(#[from] AuthError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
