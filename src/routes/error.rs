use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use crate::models::ErrorResponse;
use crate::services::{AppwriteError, PostgresError};

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Appwrite(#[from] AppwriteError),

    #[error(transparent)]
    Postgres(#[from] PostgresError),
}

impl ApiError {
    fn label(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::NotFound(_) => "Not found",
            ApiError::Appwrite(AppwriteError::NotFound(_)) => "Not found",
            ApiError::Appwrite(_) => "Profile store error",
            ApiError::Postgres(PostgresError::InvalidInput(_)) => "Validation failed",
            ApiError::Postgres(_) => "Match store error",
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Appwrite(AppwriteError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Appwrite(_) => StatusCode::BAD_GATEWAY,
            ApiError::Postgres(PostgresError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Postgres(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
