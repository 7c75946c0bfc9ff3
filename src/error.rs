use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use crate::helpers::validation::FieldError;
use crate::services::storage::StorageError;

/// Body of every error response.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorDto {
    pub status: u16,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Review rejected: {0}")]
    ReviewRejected(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::MalformedPayload(_)
            | AppError::ReviewRejected(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client. Storage and internal failures are
    /// reported generically; the detail only goes to the log.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) => "The specified restaurant was not found".to_string(),
            AppError::ReviewRejected(_) => {
                "The specified review could not be created or updated.".to_string()
            }
            AppError::Storage(_) => "Unable to save or retrieve resources at this time".to_string(),
            AppError::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Storage(e) => error!("Caught storage failure: {}", e),
            AppError::Internal(e) => error!("Caught unexpected error: {:#}", e),
            other => warn!("Request rejected with {}: {}", status, other),
        }

        let body = ErrorDto {
            status: status.as_u16(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_field_pairs() {
        let err = AppError::Validation(vec![
            FieldError::new("name", "Restaurant name is required"),
            FieldError::new("photoIds", "At least one photo ID is required"),
        ]);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.public_message(),
            "name: Restaurant name is required, photoIds: At least one photo ID is required"
        );
    }

    #[test]
    fn storage_failure_maps_to_500_with_generic_message() {
        let err = AppError::from(StorageError::Empty);

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Unable to save or retrieve resources at this time");
    }

    #[test]
    fn not_found_and_rejection_statuses() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::ReviewRejected("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
