use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::job::{ImagePayload, Job, JobId, JobResult};
use crate::services::store::{JobStore, StoreError};
use crate::services::viewer::ResultCursor;

pub type SharedSession = Arc<Mutex<Session>>;

/// Lock the session. The lock is never held across an await point, and a
/// poisoned lock still guards consistent data because every mutation is a
/// single store call.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A transient, user-facing message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

/// What happened to the job the cursor was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Result { job_id: JobId, index: usize },
    Job(JobId),
}

/// The workspace a single user interacts with: jobs, viewer cursor and the
/// last notice.
#[derive(Debug, Default)]
pub struct Session {
    store: JobStore,
    cursor: ResultCursor,
    notice: Option<Notice>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn job(&self, job_id: JobId) -> Option<&Job> {
        self.store.job(job_id)
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.store.selected_job()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// Create a job and focus it.
    pub fn create_job(&mut self, source: ImagePayload, base_prompt: &str) -> JobId {
        let id = self.store.create_job(source, base_prompt);
        // Freshly created, so selecting it cannot fail.
        let _ = self.store.select(id);
        self.sync_cursor();
        id
    }

    pub fn append_result(&mut self, job_id: JobId, result: JobResult) -> Result<usize, StoreError> {
        let index = self.store.append_result(job_id, result)?;
        self.sync_cursor();
        Ok(index)
    }

    pub fn remove_job(&mut self, job_id: JobId) -> bool {
        let removed = self.store.remove_job(job_id);
        self.sync_cursor();
        removed
    }

    pub fn remove_result(&mut self, job_id: JobId, index: usize) -> Result<JobResult, StoreError> {
        let removed = self.store.remove_result(job_id, index)?;
        match self.store.selected_job() {
            Some(job) if job.id == job_id => self.cursor.result_removed(job, index),
            _ => self.sync_cursor(),
        }
        Ok(removed)
    }

    pub fn mark_remix_pending(&mut self, job_id: JobId, label: &str) -> bool {
        self.store.mark_remix_pending(job_id, label)
    }

    pub fn clear_remix_pending(&mut self, job_id: JobId, label: &str) {
        self.store.clear_remix_pending(job_id, label);
    }

    pub fn select(&mut self, job_id: JobId) -> Result<(), StoreError> {
        self.store.select(job_id)?;
        self.sync_cursor();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.store.clear();
        self.sync_cursor();
    }

    pub fn next(&mut self) {
        let len = self.selected_len();
        self.cursor.next(len);
    }

    pub fn prev(&mut self) {
        let len = self.selected_len();
        self.cursor.prev(len);
    }

    /// Delete whatever the cursor points at: a remix, or the whole job when
    /// the cursor is on a lone base image.
    pub fn delete_current(&mut self) -> Result<Deleted, StoreError> {
        let (job_id, len) = self
            .store
            .selected_job()
            .map(|j| (j.id, j.results.len()))
            .ok_or_else(|| StoreError::InvalidOperation("No job selected".to_string()))?;
        let index = self.cursor.index();

        if index > 0 {
            self.remove_result(job_id, index)?;
            return Ok(Deleted::Result { job_id, index });
        }
        if len > 1 {
            return Err(StoreError::InvalidOperation(
                "Delete all remixes before deleting the base image".to_string(),
            ));
        }
        self.store.remove_job(job_id);
        self.sync_cursor();
        Ok(Deleted::Job(job_id))
    }

    pub fn post_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            posted_at: Utc::now(),
        });
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn selected_len(&self) -> usize {
        self.store
            .selected_job()
            .map(|j| j.results.len())
            .unwrap_or(0)
    }

    fn sync_cursor(&mut self) {
        self.cursor.observe(self.store.selected_job());
    }
}
