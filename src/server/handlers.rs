use super::{ApiError, AppState};
use crate::domain::BuildEntry;
use crate::services::{BuildSummary, JobState, RefreshMode, SearchResults, TierList};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tracing::{info, warn};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildParams {
    url: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    #[serde(default)]
    mode: RefreshMode,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResults> {
    Json(state.catalog.search(&params.q))
}

pub async fn builds(State(state): State<AppState>) -> Json<Vec<BuildSummary>> {
    Json(state.catalog.summaries())
}

pub async fn build(
    State(state): State<AppState>,
    Query(params): Query<BuildParams>,
) -> Result<Json<BuildEntry>, ApiError> {
    Ok(Json(state.catalog.build(&params.url)?))
}

pub async fn tier_list(State(state): State<AppState>) -> Json<TierList> {
    Json(state.catalog.tier_list())
}

pub async fn start_refresh(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<(StatusCode, Json<JobState>), ApiError> {
    info!("Refresh requested ({})", params.mode);
    let job = state.jobs.spawn_refresh(state.refresh.clone(), params.mode)?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

pub async fn refresh_status(State(state): State<AppState>) -> Json<JobState> {
    Json(state.jobs.snapshot())
}

/// Streams the current job's events. Ends after a terminal event, or
/// once no job is running and every recorded event has been sent.
pub async fn refresh_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let jobs = state.jobs.clone();

    let stream = async_stream::stream! {
        let mut cursor = 0;
        loop {
            // Checked before draining so events recorded right before the job ends still go out.
            let running = jobs.is_running();
            let (events, next) = jobs.events_since(cursor);
            cursor = next;

            let mut finished = false;
            for event in events {
                finished |= event.is_terminal();
                match Event::default().json_data(&event) {
                    Ok(sse) => yield Ok::<_, Infallible>(sse),
                    Err(e) => warn!("Failed to encode progress event: {}", e),
                }
            }

            if finished || !running {
                break;
            }
            tokio::time::sleep(EVENT_POLL_INTERVAL).await;
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
