//! Mapping of library errors to HTTP responses.

use atpl_extractor::{ExportError, ExtractorError, JobError};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Error returned by every handler, rendered as `{ "error": "<message>" }`.
#[derive(Debug)]
pub enum ApiError {
    Extractor(ExtractorError),
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Extractor(err) => match err {
                ExtractorError::Job(job_err) => match job_err {
                    JobError::NotFound(_)
                    | JobError::ResultNotFound(_)
                    | JobError::QuestionNotFound { .. } => StatusCode::NOT_FOUND,
                    JobError::InvalidTransition { .. } | JobError::Conflict(_) => {
                        StatusCode::CONFLICT
                    }
                    JobError::Validation(_) => StatusCode::BAD_REQUEST,
                },
                ExtractorError::Export(ExportError::Empty) => StatusCode::BAD_REQUEST,
                ExtractorError::Config(_) => StatusCode::BAD_REQUEST,
                ExtractorError::Export(_) | ExtractorError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Extractor(ExtractorError::Job(err)) => err.to_string(),
            ApiError::Extractor(ExtractorError::Export(err)) => err.to_string(),
            ApiError::Extractor(err) => err.to_string(),
        }
    }
}

impl From<ExtractorError> for ApiError {
    fn from(err: ExtractorError) -> Self {
        Self::Extractor(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            log::error!("Request failed: {}", message);
        } else {
            log::debug!("Request rejected ({}): {}", status, message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
