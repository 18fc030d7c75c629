use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::locator::models::LocationFailure;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] sqlx::Error),

    #[error("Authentication required: {0}")]
    AuthRequired(String),

    #[error("Profile missing for principal {0}")]
    ProfileMissing(String),

    #[error("Profile mismatch: {0}")]
    ProfileMismatch(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(LocationFailure),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationFailed(vec![message.into()])
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::ValidationFailed(messages)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::FetchFailed(ref e) => {
                tracing::error!("Store query failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch data, please retry".to_string(),
                    None,
                )
            }
            AppError::AuthRequired(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::ProfileMissing(_) => (
                StatusCode::NOT_FOUND,
                "Profile not found, complete onboarding first".to_string(),
                None,
            ),
            AppError::ProfileMismatch(ref msg) => (
                StatusCode::UNAUTHORIZED,
                format!("{}. Please sign in again", msg),
                None,
            ),
            AppError::LocationUnavailable(ref cause) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Location unavailable: {}", cause),
                Some(vec![cause.code().to_string()]),
            ),
            AppError::UploadFailed(ref msg) => {
                tracing::error!("Upload failed: {}", msg);
                (StatusCode::BAD_GATEWAY, "Photo upload failed".to_string(), None)
            }
            AppError::ValidationFailed(ref msgs) => (
                StatusCode::BAD_REQUEST,
                msgs.first()
                    .cloned()
                    .unwrap_or_else(|| "Validation failed".to_string()),
                Some(msgs.clone()),
            ),
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
