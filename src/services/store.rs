use crate::models::job::{ImagePayload, Job, JobId, JobResult, JobStatus};

/// Ordered, in-memory collection of jobs (newest first) plus the current
/// selection.
///
/// Every mutation re-applies the selection-follow rule: a selection that
/// points at a missing job falls back to the first job, and an empty
/// selection picks the first job when there is one.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: Vec<Job>,
    selected: Option<JobId>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job at the front of the collection.
    pub fn create_job(&mut self, source: ImagePayload, base_prompt: impl Into<String>) -> JobId {
        let job = Job::new(source, base_prompt);
        let id = job.id;
        self.jobs.insert(0, job);
        self.follow_selection();
        id
    }

    /// Append a result and return its index. The first result completes the job.
    pub fn append_result(&mut self, job_id: JobId, result: JobResult) -> Result<usize, StoreError> {
        let job = self.job_mut(job_id)?;
        job.results.push(result);
        if job.results.len() == 1 {
            job.status = JobStatus::Completed;
        }
        Ok(job.results.len() - 1)
    }

    /// Remove a job and all of its results. Returns whether anything was removed.
    pub fn remove_job(&mut self, job_id: JobId) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != job_id);
        self.follow_selection();
        self.jobs.len() != before
    }

    /// Remove a single remix. The base result only goes away with its job.
    pub fn remove_result(&mut self, job_id: JobId, index: usize) -> Result<JobResult, StoreError> {
        let job = self.job_mut(job_id)?;
        if index >= job.results.len() {
            return Err(StoreError::InvalidOperation(format!(
                "result {} does not exist (job has {})",
                index,
                job.results.len()
            )));
        }
        if index == 0 {
            let reason = if job.has_remixes() {
                "Delete all remixes before deleting the base image"
            } else {
                "The base image is removed by deleting its job"
            };
            return Err(StoreError::InvalidOperation(reason.to_string()));
        }
        Ok(job.results.remove(index))
    }

    /// Returns false when the label was already pending or the job is gone.
    pub fn mark_remix_pending(&mut self, job_id: JobId, label: &str) -> bool {
        match self.job_mut(job_id) {
            Ok(job) => job.pending_remix_labels.insert(label.to_string()),
            Err(_) => false,
        }
    }

    pub fn clear_remix_pending(&mut self, job_id: JobId, label: &str) {
        if let Ok(job) = self.job_mut(job_id) {
            job.pending_remix_labels.remove(label);
        }
    }

    pub fn job(&self, job_id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == job_id)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn selected(&self) -> Option<JobId> {
        self.selected
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.selected.and_then(|id| self.job(id))
    }

    pub fn select(&mut self, job_id: JobId) -> Result<(), StoreError> {
        if self.job(job_id).is_none() {
            return Err(StoreError::NotFound(job_id));
        }
        self.selected = Some(job_id);
        Ok(())
    }

    /// Drop every job and the selection.
    pub fn clear(&mut self) {
        self.jobs.clear();
        self.selected = None;
    }

    fn job_mut(&mut self, job_id: JobId) -> Result<&mut Job, StoreError> {
        self.jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or(StoreError::NotFound(job_id))
    }

    fn follow_selection(&mut self) {
        let still_present = self
            .selected
            .map(|id| self.jobs.iter().any(|j| j.id == id))
            .unwrap_or(false);
        if !still_present {
            self.selected = self.jobs.first().map(|j| j.id);
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Job {0} not found")]
    NotFound(JobId),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
