use atpl_extractor::catalog::{all_subjects, Subject};
use axum::{routing::get, Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/subjects", get(list_subjects))
}

async fn list_subjects() -> Json<&'static [Subject]> {
    Json(all_subjects())
}
