use axum::{response::IntoResponse, Json};
use flowdraft_migrate::MigrationError;
use flowdraft_storage::StorageError;
use http::StatusCode;
use serde_json::json;

use crate::validation::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Publish(_) => "PUBLISH_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Migration(_) => "MIGRATION_ERROR",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Publish(_) => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Migration(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => AppError::NotFound(what),
            StorageError::NoDraft(id) => AppError::Publish(format!("template '{}' has no draft", id)),
            e @ (StorageError::VersionConflict { .. } | StorageError::ConcurrentModification(_)) => {
                AppError::Validation(e.to_string())
            }
            StorageError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status_code(), Json(body)).into_response()
    }
}
