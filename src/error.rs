use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Store(err) => match err {
                StoreError::Conflict { .. } | StoreError::InUse(_) => {
                    (StatusCode::CONFLICT, err.to_string())
                }
                StoreError::MissingReference(_) | StoreError::InvalidUsername(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
                StoreError::Credential(_) | StoreError::Pool(_) | StoreError::Sql(_) => {
                    tracing::error!("Store error: {}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
