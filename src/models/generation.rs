use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::{Job, JobStatus};

/// Request to remix a job (JSON body). Exactly one of `prompt` or `preset`.
#[derive(Debug, Deserialize, Validate)]
pub struct RemixRequest {
    #[garde(length(min = 1, max = 2000))]
    pub prompt: Option<String>,

    #[garde(length(min = 1, max = 100))]
    pub preset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub job_id: Uuid,
}

/// Response after a generation was admitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultView {
    pub index: usize,
    pub prompt: String,
    pub mime_type: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub status: JobStatus,
    pub result_count: usize,
    pub thumbnail_url: Option<String>,
    pub pending_presets: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: Uuid,
    pub status: JobStatus,
    pub base_prompt: String,
    pub original_url: String,
    pub results: Vec<ResultView>,
    pub pending_presets: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
    pub selected_job_id: Option<Uuid>,
    pub in_flight: usize,
    pub capacity: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewerResponse {
    pub job: Option<JobDetail>,
    pub cursor: usize,
    pub can_navigate: bool,
    /// False while the cursor is on a base image that still has remixes.
    pub can_delete: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn result_image_url(job_id: Uuid, index: usize) -> String {
    format!("/api/v1/jobs/{}/results/{}/image", job_id, index)
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            result_count: job.results.len(),
            thumbnail_url: job.base_result().map(|_| result_image_url(job.id, 0)),
            pending_presets: job.pending_remix_labels.iter().cloned().collect(),
            created_at: job.created_at,
        }
    }
}

impl From<&Job> for JobDetail {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            base_prompt: job.base_prompt.clone(),
            original_url: format!("/api/v1/jobs/{}/original", job.id),
            results: job
                .results
                .iter()
                .enumerate()
                .map(|(index, r)| ResultView {
                    index,
                    prompt: r.prompt.clone(),
                    mime_type: r.image.mime_type.clone(),
                    image_url: result_image_url(job.id, index),
                    created_at: r.created_at,
                })
                .collect(),
            pending_presets: job.pending_remix_labels.iter().cloned().collect(),
            created_at: job.created_at,
        }
    }
}
