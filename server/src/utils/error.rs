use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::services::AccessError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Access(e) => match e {
                AccessError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                AccessError::NotFound => StatusCode::NOT_FOUND,
                AccessError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                AccessError::Transport(_)
                | AccessError::Remote { .. }
                | AccessError::InvalidDate(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Access(e) => match e {
                AccessError::NotConfigured => "NOT_CONFIGURED",
                AccessError::NotFound => "NOT_FOUND",
                AccessError::Timeout(_) => "UPSTREAM_TIMEOUT",
                AccessError::Transport(_) => "TRANSPORT_ERROR",
                AccessError::Remote { .. } => "REMOTE_ERROR",
                AccessError::InvalidDate(_) => "INVALID_UPSTREAM_DATA",
            },
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::Access(AccessError::Remote { status, message }) => {
                error!(upstream_status = status, message = %message, "Upstream API error");
            }
            AppError::Access(e) => {
                error!(error = ?e, "Event access error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        let public_message = match &self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::Access(e) => e.to_string(),
        };

        error_response(code, public_message, status)
    }
}
