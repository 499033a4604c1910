use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    RoomConflict(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("transaction could not be committed")]
    TransactionError(#[source] sqlx::Error),
    #[error("an error occurred while running a database query")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("booking contention was not resolved after retrying")]
    SerializationRetryExceeded,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EntityNotFound(_) | AppError::NoRowsAffectedError(_) => StatusCode::NOT_FOUND,
            AppError::RoomConflict(_) => StatusCode::CONFLICT,
            AppError::SerializationRetryExceeded => StatusCode::SERVICE_UNAVAILABLE,
            e @ (AppError::TransactionError(_) | AppError::SpecificOperationError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        status_code.into_response()
    }
}
