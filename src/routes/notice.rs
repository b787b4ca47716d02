use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::services::session::{self, Notice};

/// GET /api/v1/notice — The latest user-facing failure, if any.
pub async fn get_notice(State(state): State<AppState>) -> Json<Option<Notice>> {
    Json(session::lock(&state.session).notice().cloned())
}

/// DELETE /api/v1/notice
pub async fn dismiss_notice(State(state): State<AppState>) -> StatusCode {
    session::lock(&state.session).dismiss_notice();
    StatusCode::NO_CONTENT
}
