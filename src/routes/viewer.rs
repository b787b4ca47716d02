use axum::extract::State;
use axum::Json;

use crate::app_state::AppState;
use crate::models::generation::{JobDetail, SelectRequest, ViewerResponse};
use crate::routes::error::ApiError;
use crate::services::session::{self, Session};

fn snapshot(session: &Session) -> ViewerResponse {
    let job = session.selected_job();
    let cursor = session.cursor();
    ViewerResponse {
        job: job.map(JobDetail::from),
        cursor,
        can_navigate: job.map(|j| j.results.len() > 1).unwrap_or(false),
        can_delete: job.map(|j| cursor > 0 || !j.has_remixes()).unwrap_or(false),
    }
}

/// GET /api/v1/viewer — Selected job and the result the cursor is on.
pub async fn get_viewer(State(state): State<AppState>) -> Json<ViewerResponse> {
    Json(snapshot(&session::lock(&state.session)))
}

/// POST /api/v1/viewer/select
pub async fn select_job(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<ViewerResponse>, ApiError> {
    let mut session = session::lock(&state.session);
    session.select(request.job_id)?;
    Ok(Json(snapshot(&session)))
}

/// POST /api/v1/viewer/next
pub async fn next_result(State(state): State<AppState>) -> Json<ViewerResponse> {
    let mut session = session::lock(&state.session);
    session.next();
    Json(snapshot(&session))
}

/// POST /api/v1/viewer/prev
pub async fn prev_result(State(state): State<AppState>) -> Json<ViewerResponse> {
    let mut session = session::lock(&state.session);
    session.prev();
    Json(snapshot(&session))
}

/// DELETE /api/v1/viewer/current — Delete the remix under the cursor, or the
/// job itself when only its base image is left.
pub async fn delete_current(
    State(state): State<AppState>,
) -> Result<Json<ViewerResponse>, ApiError> {
    let mut session = session::lock(&state.session);
    let deleted = session.delete_current()?;
    tracing::info!(?deleted, "Deleted from viewer");
    Ok(Json(snapshot(&session)))
}
