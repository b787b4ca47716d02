use axum::routing::{delete, get, post};
use axum::Router;

use crate::app_state::AppState;

pub mod error;
pub mod health;
pub mod jobs;
pub mod metrics;
pub mod notice;
pub mod presets;
pub mod viewer;

/// Health check plus the versioned JSON API.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/jobs",
            post(jobs::submit_job)
                .get(jobs::list_jobs)
                .delete(jobs::reset_jobs),
        )
        .route(
            "/api/v1/jobs/{job_id}",
            get(jobs::get_job).delete(jobs::delete_job),
        )
        .route("/api/v1/jobs/{job_id}/remix", post(jobs::remix_job))
        .route("/api/v1/jobs/{job_id}/original", get(jobs::original_image))
        .route(
            "/api/v1/jobs/{job_id}/results/{index}",
            delete(jobs::delete_result),
        )
        .route(
            "/api/v1/jobs/{job_id}/results/{index}/image",
            get(jobs::result_image),
        )
        .route("/api/v1/presets", get(presets::list_presets))
        .route("/api/v1/viewer", get(viewer::get_viewer))
        .route("/api/v1/viewer/select", post(viewer::select_job))
        .route("/api/v1/viewer/next", post(viewer::next_result))
        .route("/api/v1/viewer/prev", post(viewer::prev_result))
        .route("/api/v1/viewer/current", delete(viewer::delete_current))
        .route(
            "/api/v1/notice",
            get(notice::get_notice).delete(notice::dismiss_notice),
        )
        .with_state(state)
}
