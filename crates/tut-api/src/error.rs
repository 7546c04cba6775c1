use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use tut_db::StoreError;
use tut_quiz::GenerateError;

use crate::media::UploadError;

/// All the ways a request can fail. Every variant maps to one HTTP status
/// and a `{"error": ...}` JSON body.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),
    /// Missing or unusable bearer token
    #[error("Authentication required: {0}")]
    Auth(String),
    /// The addressed resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A publish for this draft is still running
    #[error("A submission is already in progress for this draft")]
    SubmissionInFlight,
    /// The image host rejected or failed the upload
    #[error("Image upload failed: {0}")]
    Upload(#[from] UploadError),
    /// The quiz service failed or returned an unusable quiz
    #[error("Quiz generation failed: {0}")]
    QuizGeneration(#[from] GenerateError),
    /// The document store failed
    #[error("Store error: {0}")]
    Store(StoreError),
    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TutorialNotFound(_) => Self::NotFound("tutorial"),
            other => Self::Store(other),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::QuizGeneration(GenerateError::EmptyContent) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::SubmissionInFlight => StatusCode::CONFLICT,
            Self::Upload(_) | Self::QuizGeneration(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
