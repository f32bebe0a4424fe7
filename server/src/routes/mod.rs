pub mod failed;
pub mod health;
pub mod jobs;
pub mod logs;
pub mod results;
pub mod settings;
pub mod stream;
pub mod subjects;

use axum::Router;

use crate::state::AppState;

/// Routes under `/api`.
pub fn api_router() -> Router<AppState> {
    let extraction = Router::new()
        .merge(results::router())
        .merge(jobs::router())
        .merge(failed::router())
        .merge(logs::router())
        .merge(stream::router());

    Router::new()
        .merge(subjects::router())
        .merge(settings::router())
        .nest("/extraction", extraction)
}
