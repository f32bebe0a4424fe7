//! Job log listing, clearing and CSV export.

use atpl_extractor::export::attachment_header;
use atpl_extractor::model::{ExtractionLog, LogFilter, LogLevel};
use atpl_extractor::Download;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub level: Option<String>,
    pub search: Option<String>,
}

impl LogQuery {
    /// `all` and an empty value mean no level filter.
    fn into_filter(self) -> ApiResult<LogFilter> {
        let level = match self.level.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                LogLevel::parse(raw)
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid log level: {}", raw)))?,
            ),
        };
        let search = self.search.filter(|s| !s.trim().is_empty());
        Ok(LogFilter { level, search })
    }
}

#[derive(Debug, Serialize)]
pub struct ClearLogsResponse {
    pub success: bool,
    pub deleted: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:job_id/logs", get(list_logs).delete(clear_logs))
        .route("/:job_id/logs/export", get(export_logs))
}

async fn list_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ExtractionLog>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    state.service.get_job(&job_id)?;
    Ok(Json(state.service.list_logs(&job_id, &filter)?))
}

async fn clear_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ClearLogsResponse>> {
    state.service.get_job(&job_id)?;
    let deleted = state.service.clear_logs(&job_id)?;
    Ok(Json(ClearLogsResponse {
        success: true,
        deleted,
    }))
}

async fn export_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    state.service.get_job(&job_id)?;
    Ok(attachment(state.service.export_logs(&job_id)?))
}

/// Renders a generated file as a download.
pub(crate) fn attachment(download: Download) -> Response {
    (
        [
            (header::CONTENT_TYPE, download.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment_header(&download.file_name),
            ),
        ],
        download.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_all_means_no_filter() {
        let filter = LogQuery {
            level: Some("all".to_string()),
            search: Some("  ".to_string()),
        }
        .into_filter()
        .unwrap();
        assert!(filter.level.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let result = LogQuery {
            level: Some("verbose".to_string()),
            search: None,
        }
        .into_filter();
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
