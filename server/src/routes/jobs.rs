//! Job lifecycle endpoints.

use atpl_extractor::model::{CreateJobRequest, ExtractionJob};
use atpl_extractor::JobStats;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobActionResponse {
    pub success: bool,
    pub job: ExtractionJob,
}

impl JobActionResponse {
    fn ok(job: ExtractionJob) -> Json<Self> {
        Json(Self { success: true, job })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_job))
        .route("/jobs", get(list_jobs))
        .route("/:job_id", get(get_job))
        .route("/:job_id/start", post(start_job))
        .route("/:job_id/pause", post(pause_job))
        .route("/:job_id/stop", post(stop_job))
        .route("/:job_id/stats", get(job_stats))
}

async fn create_job(
    State(state): State<AppState>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> ApiResult<Json<ExtractionJob>> {
    let Json(request) = body?;
    Ok(Json(state.service.create_job(request)?))
}

async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<ExtractionJob>>> {
    Ok(Json(state.service.list_jobs()?))
}

async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ExtractionJob>> {
    Ok(Json(state.service.get_job(&job_id)?))
}

async fn start_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobActionResponse>> {
    Ok(JobActionResponse::ok(state.service.start(&job_id)?))
}

async fn pause_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobActionResponse>> {
    Ok(JobActionResponse::ok(state.service.pause(&job_id)?))
}

async fn stop_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobActionResponse>> {
    Ok(JobActionResponse::ok(state.service.stop(&job_id)?))
}

async fn job_stats(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStats>> {
    Ok(Json(state.service.stats(&job_id)?))
}
