use atpl_extractor::model::UserSettings;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).post(save_settings))
}

async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<UserSettings>> {
    Ok(Json(state.service.settings()?))
}

async fn save_settings(
    State(state): State<AppState>,
    body: Result<Json<UserSettings>, JsonRejection>,
) -> ApiResult<Json<UserSettings>> {
    let Json(settings) = body?;
    Ok(Json(state.service.save_settings(&settings)?))
}
