use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::validation::FieldErrors;

/// Every failure a handler can surface. `Internal` wraps anything unexpected
/// and is rendered without detail.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<FieldErrors>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found() -> Self {
        AppError::NotFound("User not found".into())
    }
}

/// Router fallback for paths no route matches.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Resource not found".into())
}

/// Route fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Internal(e) => {
                error!(error = ?e, "unhandled error");
                ErrorBody {
                    message: "internal server error".into(),
                    payload: None,
                }
            }
            AppError::Validation(fields) => {
                warn!(%status, payload = ?fields, "validation error");
                ErrorBody {
                    message: "Validation error".into(),
                    payload: Some(fields),
                }
            }
            other => {
                let message = other.to_string();
                warn!(%status, %message, "api error");
                ErrorBody {
                    message,
                    payload: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
