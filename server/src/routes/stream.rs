//! Server-Sent Events for one job.
//!
//! GET /api/extraction/:job_id/events
//!
//! The stream opens with a `snapshot` event carrying the job as stored, then
//! forwards the job's `progress` and `log` events as they are broadcast. A
//! slow client that falls behind gets a `lagged` event with the number of
//! missed messages.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:job_id/events", get(job_events))
}

async fn job_events(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    // Subscribe before reading the snapshot so nothing falls in between.
    let progress_rx = state.service.store().progress().subscribe();
    let log_rx = state.service.store().logs().subscribe();
    let job = state.service.get_job(&job_id)?;
    log::debug!("SSE client subscribed to job {}", job_id);

    let snapshot = stream::once(async move { Ok::<_, Infallible>(json_event("snapshot", &job)) });

    let progress_job = job_id.clone();
    let progress = BroadcastStream::new(progress_rx).filter_map(move |item| {
        let event = match item {
            Ok(event) if event.job_id == progress_job => Some(json_event("progress", &event)),
            Ok(_) => None,
            Err(lagged) => Some(lagged_event(lagged)),
        };
        async move { event.map(Ok::<_, Infallible>) }
    });

    let logs = BroadcastStream::new(log_rx).filter_map(move |item| {
        let event = match item {
            Ok(entry) if entry.job_id == job_id => Some(json_event("log", &entry)),
            Ok(_) => None,
            Err(lagged) => Some(lagged_event(lagged)),
        };
        async move { event.map(Ok::<_, Infallible>) }
    });

    Ok(Sse::new(snapshot.chain(stream::select(progress, logs))).keep_alive(KeepAlive::default()))
}

fn json_event<T: Serialize>(name: &str, payload: &T) -> Event {
    match Event::default().event(name).json_data(payload) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("Failed to encode {} event: {}", name, e);
            Event::default().event("error").data(e.to_string())
        }
    }
}

fn lagged_event(err: BroadcastStreamRecvError) -> Event {
    let BroadcastStreamRecvError::Lagged(missed) = err;
    log::warn!("SSE client lagged, missed {} events", missed);
    json_event("lagged", &serde_json::json!({ "missed": missed }))
}
