use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("A guest with this name already exists")]
    DuplicateGuest,
    #[error("Guest not found")]
    GuestNotFound,
    #[error("Guest is currently checked in")]
    GuestCurrentlyCheckedIn,
    #[error("Display id sequence for this year is exhausted")]
    SequenceLimitExceeded,
    #[error("Generated display id is already taken")]
    DisplayIdGenerationFailed,
    #[error("Guest is already checked in")]
    AlreadyCheckedIn,
    #[error("Guest is not checked in")]
    NotCheckedIn,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(e) if is_unique_violation(e) => "CONFLICT",
            AppError::Database(_) => "INTERNAL_ERROR",
            AppError::DuplicateGuest => "DUPLICATE_GUEST",
            AppError::GuestNotFound => "GUEST_NOT_FOUND",
            AppError::GuestCurrentlyCheckedIn => "GUEST_CURRENTLY_CHECKED_IN",
            AppError::SequenceLimitExceeded => "SEQUENCE_LIMIT_EXCEEDED",
            AppError::DisplayIdGenerationFailed => "DISPLAY_ID_GENERATION_FAILED",
            AppError::AlreadyCheckedIn => "ALREADY_CHECKED_IN",
            AppError::NotCheckedIn => "NOT_CHECKED_IN",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::DisplayIdGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GuestNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateGuest
            | AppError::GuestCurrentlyCheckedIn
            | AppError::SequenceLimitExceeded
            | AppError::AlreadyCheckedIn
            | AppError::NotCheckedIn => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// 2067 / 1555 = SQLite UNIQUE / PRIMARY KEY constraint
// 23505 = PostgreSQL unique_violation
fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == "2067" || code == "1555" || code == "23505")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) if is_unique_violation(e) => {
                "Resource already exists (duplicate entry)".to_string()
            }
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::DisplayIdGenerationFailed => {
                error!("Display id collision after allocation");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Failures that prevent the server from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_codes_and_statuses() {
        let cases = [
            (AppError::DuplicateGuest, "DUPLICATE_GUEST", StatusCode::CONFLICT),
            (AppError::GuestNotFound, "GUEST_NOT_FOUND", StatusCode::NOT_FOUND),
            (AppError::GuestCurrentlyCheckedIn, "GUEST_CURRENTLY_CHECKED_IN", StatusCode::CONFLICT),
            (AppError::SequenceLimitExceeded, "SEQUENCE_LIMIT_EXCEEDED", StatusCode::CONFLICT),
            (AppError::DisplayIdGenerationFailed, "DISPLAY_ID_GENERATION_FAILED", StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Validation("bad".into()), "VALIDATION_ERROR", StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, "UNAUTHORIZED", StatusCode::UNAUTHORIZED),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_non_constraint_database_errors_are_internal() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
