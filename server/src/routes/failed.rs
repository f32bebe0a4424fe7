//! Failed questions and retries.

use atpl_extractor::model::FailedQuestion;
use atpl_extractor::retry::{BatchRetryOutcome, RetryOutcome};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRequest {
    #[serde(default)]
    pub question_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryAllRequest {
    #[serde(default)]
    pub question_ids: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:job_id/failed", get(list_failed))
        .route("/:job_id/retry", post(retry_question))
        .route("/:job_id/retry-all", post(retry_all))
}

async fn list_failed(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Vec<FailedQuestion>>> {
    state.service.get_job(&job_id)?;
    Ok(Json(state.service.list_failed(&job_id)?))
}

async fn retry_question(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    body: Result<Json<RetryRequest>, JsonRejection>,
) -> ApiResult<Json<RetryOutcome>> {
    let Json(request) = body?;
    if request.question_id.trim().is_empty() {
        return Err(ApiError::bad_request("Question ID is required"));
    }
    Ok(Json(
        state.service.retry_question(&job_id, &request.question_id)?,
    ))
}

async fn retry_all(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    body: Result<Json<RetryAllRequest>, JsonRejection>,
) -> ApiResult<Json<BatchRetryOutcome>> {
    let Json(request) = body?;
    if request.question_ids.is_empty() {
        return Err(ApiError::bad_request("Question IDs are required"));
    }
    Ok(Json(state.service.retry_all(&job_id, &request.question_ids)?))
}
