use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Order already restored")]
    AlreadyRestored,

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyRestored => StatusCode::CONFLICT,
            AppError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Schema(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiResponse::<serde_json::Value>::error(self.to_string());
        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
