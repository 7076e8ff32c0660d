//! Error types and result aliases for the Gemsrack console

use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("{0}")]
    Api(#[from] crate::services::ApiError),

    #[error("{0}")]
    Gem(#[from] crate::services::GemError),

    #[error("{0}")]
    Usage(#[from] crate::services::UsageError),

    #[error("{0}")]
    Session(#[from] crate::services::SessionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the underlying cause is an HTTP 401 from the API
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AppError::Api(e) => e.is_unauthorized(),
            AppError::Gem(crate::services::GemError::Api(e)) => e.is_unauthorized(),
            AppError::Usage(crate::services::UsageError::Api(e)) => e.is_unauthorized(),
            AppError::Session(crate::services::SessionError::Api(e)) => e.is_unauthorized(),
            _ => false,
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

/// Error payload emitted by `--format json` output
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::Database(e) => ("DATABASE_ERROR", e.to_string()),
            AppError::Api(e) => ("API_ERROR", e.to_string()),
            AppError::Gem(e) => ("GEM_ERROR", e.to_string()),
            AppError::Usage(e) => ("USAGE_ERROR", e.to_string()),
            AppError::Session(e) => ("SESSION_ERROR", e.to_string()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Io(e) => ("IO_ERROR", e.to_string()),
            AppError::Json(e) => ("JSON_ERROR", e.to_string()),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone()),
        };

        ErrorResponse {
            code: code.to_string(),
            message,
            details: None,
        }
    }
}

// Convenience trait for adding context to errors
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_context<F, S>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| {
            let base_err: AppError = e.into();
            AppError::Internal(format!("{}: {}", f().into(), base_err))
        })
    }
}
