use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::usecase::UseCaseError;

/// AppError は API の統一エラーレスポンス。
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error_code: String,
    message: String,
}

impl AppError {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "No results found!".to_string(),
        }
    }

    pub fn unprocessable() -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Request cannot be processed: Invalid input data!".to_string(),
        }
    }

    pub fn bad_request(detail: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Request cannot be processed: Bad request! {detail}"),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error_code: self.status.as_u16().to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<UseCaseError> for AppError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::NotFound => Self::not_found(),
            UseCaseError::Validation(detail) => Self::bad_request(&detail),
            UseCaseError::Unprocessable(e) => {
                warn!(error = %e, "write rejected by storage");
                Self::unprocessable()
            }
            UseCaseError::Internal(e) => {
                error!(error = %e, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(&rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_case_error_mapping() {
        assert_eq!(AppError::from(UseCaseError::NotFound).status, StatusCode::NOT_FOUND);

        let err = AppError::from(UseCaseError::validation("No title provided!"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Request cannot be processed: Bad request! No title provided!"
        );

        let err = AppError::from(UseCaseError::Unprocessable(anyhow::anyhow!("duplicate")));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::from(UseCaseError::Internal(anyhow::anyhow!("db down")));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
