//! Result listing, preview and downloads.

use atpl_extractor::export::ResultPreview;
use atpl_extractor::model::ExtractionResult;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::logs::attachment;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultQuery {
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDownloadRequest {
    #[serde(default)]
    pub result_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/results", get(list_results))
        .route("/results/:result_id", delete(delete_result))
        .route("/preview/:result_id", get(preview_result))
        .route("/download/bulk", post(download_bulk))
        .route("/download/:result_id", get(download_result))
}

async fn list_results(
    State(state): State<AppState>,
    query: Result<Query<ResultQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ExtractionResult>>> {
    let Query(query) = query?;
    let job_id = query.job_id.as_deref().filter(|id| !id.is_empty());
    Ok(Json(state.service.list_results(job_id)?))
}

async fn delete_result(
    State(state): State<AppState>,
    Path(result_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.service.delete_result(&result_id)?;
    Ok(Json(DeleteResponse { success: true }))
}

async fn preview_result(
    State(state): State<AppState>,
    Path(result_id): Path<String>,
) -> ApiResult<Json<ResultPreview>> {
    Ok(Json(state.service.preview_result(&result_id)?))
}

async fn download_result(
    State(state): State<AppState>,
    Path(result_id): Path<String>,
) -> ApiResult<Response> {
    Ok(attachment(state.service.download_result(&result_id)?))
}

async fn download_bulk(
    State(state): State<AppState>,
    body: Result<Json<BulkDownloadRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body?;
    if request.result_ids.is_empty() {
        return Err(ApiError::bad_request("Result IDs are required"));
    }
    Ok(attachment(state.service.download_bulk(&request.result_ids)?))
}
