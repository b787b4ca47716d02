use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use garde::Validate;
use image::ImageFormat;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::generation::{
    JobDetail, JobListResponse, JobSummary, RemixRequest, SubmitResponse,
};
use crate::models::job::{ImagePayload, JobStatus};
use crate::models::preset::find_preset;
use crate::routes::error::ApiError;
use crate::services::gate::{Generation, GenerationIntent};
use crate::services::session;

/// POST /api/v1/jobs — Upload a photo and start its first generation.
pub async fn submit_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let mut upload: Option<ImagePayload> = None;
    let mut prompt: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let declared = field
                    .content_type()
                    .filter(|ct| ct.starts_with("image/"))
                    .map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;

                // Sniff the format from the magic bytes; nothing is decoded.
                let format = image::guess_format(&data).map_err(|_| {
                    ApiError::new(
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        "Upload is not a recognised image",
                    )
                })?;
                // The sniffed type wins over whatever the client declared.
                let sniffed = format.to_mime_type();
                let mime_type = if sniffed.starts_with("image/") {
                    sniffed.to_string()
                } else {
                    declared.unwrap_or_else(|| sniffed.to_string())
                };
                upload = Some(ImagePayload::new(data.to_vec(), mime_type));
            }
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;
                if !text.trim().is_empty() {
                    prompt = Some(text);
                }
            }
            _ => {}
        }
    }

    let source = upload.ok_or_else(|| ApiError::bad_request("Missing image field"))?;
    let prompt = prompt.unwrap_or_else(|| state.default_prompt.to_string());

    let generation = state
        .gate
        .begin(GenerationIntent::NewJob { source, prompt })?;
    let job_id = spawn_generation(generation);

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            job_id,
            status: JobStatus::Generating,
            message: "Image submitted for generation".to_string(),
        }),
    ))
}

/// POST /api/v1/jobs/{job_id}/remix — Generate a variant of the job's base image.
pub async fn remix_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<RemixRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let (prompt, preset_label) = match (request.prompt, request.preset) {
        (Some(prompt), None) => (prompt.trim().to_string(), None),
        (None, Some(label)) => {
            let preset = find_preset(&label)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown preset '{}'", label)))?;
            (preset.prompt.to_string(), Some(preset.label.to_string()))
        }
        _ => return Err(ApiError::bad_request("Provide exactly one of prompt or preset")),
    };

    let generation = state.gate.begin(GenerationIntent::Remix {
        job_id,
        prompt,
        preset_label,
    })?;
    spawn_generation(generation);

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            job_id,
            status: JobStatus::Completed,
            message: "Remix submitted for generation".to_string(),
        }),
    ))
}

/// GET /api/v1/jobs — All jobs, newest first.
pub async fn list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    let session = session::lock(&state.session);
    Json(JobListResponse {
        jobs: session.store().jobs().iter().map(JobSummary::from).collect(),
        selected_job_id: session.store().selected(),
        in_flight: state.gate.in_flight(),
        capacity: state.gate.capacity(),
    })
}

/// DELETE /api/v1/jobs — Start over with an empty workspace.
pub async fn reset_jobs(State(state): State<AppState>) -> StatusCode {
    session::lock(&state.session).reset();
    tracing::info!("Workspace reset");
    StatusCode::NO_CONTENT
}

/// GET /api/v1/jobs/{job_id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetail>, ApiError> {
    let session = session::lock(&state.session);
    let job = session
        .job(job_id)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;
    Ok(Json(JobDetail::from(job)))
}

/// DELETE /api/v1/jobs/{job_id} — Idempotent.
pub async fn delete_job(State(state): State<AppState>, Path(job_id): Path<Uuid>) -> StatusCode {
    if session::lock(&state.session).remove_job(job_id) {
        tracing::info!(%job_id, "Job deleted");
    }
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/jobs/{job_id}/results/{index}
pub async fn delete_result(
    State(state): State<AppState>,
    Path((job_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<JobDetail>, ApiError> {
    let mut session = session::lock(&state.session);
    session.remove_result(job_id, index)?;
    tracing::info!(%job_id, index, "Result deleted");
    let job = session
        .job(job_id)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;
    Ok(Json(JobDetail::from(job)))
}

/// GET /api/v1/jobs/{job_id}/results/{index}/image — Download one result.
pub async fn result_image(
    State(state): State<AppState>,
    Path((job_id, index)): Path<(Uuid, usize)>,
) -> Result<Response, ApiError> {
    let image = {
        let session = session::lock(&state.session);
        let job = session
            .job(job_id)
            .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;
        job.results
            .get(index)
            .map(|r| r.image.clone())
            .ok_or_else(|| ApiError::not_found(format!("Result {} not found", index)))?
    };
    Ok(image_response(&image, &format!("objectlens-{}-{}", job_id, index + 1)))
}

/// GET /api/v1/jobs/{job_id}/original — The uploaded capture, unchanged.
pub async fn original_image(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let image = session::lock(&state.session)
        .job(job_id)
        .map(|j| j.original_image.clone())
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;
    Ok(image_response(&image, &format!("objectlens-{}-original", job_id)))
}

fn spawn_generation(generation: Generation) -> Uuid {
    let job_id = generation.job_id();
    tokio::spawn(async move {
        // Outcomes are logged by the gate and failures surface as a notice.
        let _ = generation.run().await;
    });
    job_id
}

fn image_response(image: &ImagePayload, stem: &str) -> Response {
    let extension = ImageFormat::from_mime_type(&image.mime_type)
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("png");
    let disposition = format!("attachment; filename=\"{}.{}\"", stem, extension);

    (
        [
            (header::CONTENT_TYPE, image.mime_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(image.data.to_vec()),
    )
        .into_response()
}
