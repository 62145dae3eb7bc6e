use crate::shared::validation::ValidationFailureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error ({kind}): {message}")]
    Validation {
        kind: ValidationFailureKind,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(kind: ValidationFailureKind, message: impl Into<String>) -> Self {
        AppError::Validation {
            kind,
            message: message.into(),
        }
    }

    /// バリデーション起因のエラーかどうか。
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
