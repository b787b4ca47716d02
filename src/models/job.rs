use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use strum::{Display, EnumString};
use uuid::Uuid;

pub type JobId = Uuid;

/// Lifecycle of a job in the workspace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Generating,
    Completed,
    /// Not produced by the gate: a failed first generation discards the job.
    Error,
}

/// Image bytes plus their media type. Cloning shares the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: Arc<[u8]>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One generated variant of a job.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub image: ImagePayload,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl JobResult {
    pub fn new(image: ImagePayload, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }
}

/// A captured or uploaded source image and everything generated from it.
///
/// `results[0]` is the base image; later entries are remixes in completion
/// order.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub original_image: ImagePayload,
    pub status: JobStatus,
    pub results: Vec<JobResult>,
    pub base_prompt: String,
    pub pending_remix_labels: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(original_image: ImagePayload, base_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_image,
            status: JobStatus::Generating,
            results: Vec::new(),
            base_prompt: base_prompt.into(),
            pending_remix_labels: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn base_result(&self) -> Option<&JobResult> {
        self.results.first()
    }

    pub fn has_remixes(&self) -> bool {
        self.results.len() > 1
    }
}
