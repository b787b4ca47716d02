use crate::models::job::{Job, JobId};

/// Position within the selected job's results.
///
/// The cursor jumps to the newest result whenever the selected job or its
/// result count changes, except after a delete reported through
/// [`ResultCursor::result_removed`].
#[derive(Debug, Default, Clone)]
pub struct ResultCursor {
    index: usize,
    observed: Option<(JobId, usize)>,
}

impl ResultCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Re-align with the currently selected job.
    pub fn observe(&mut self, job: Option<&Job>) {
        let key = job.map(|j| (j.id, j.results.len()));
        if key == self.observed {
            return;
        }
        self.observed = key;
        self.index = key.map(|(_, len)| len.saturating_sub(1)).unwrap_or(0);
    }

    pub fn next(&mut self, len: usize) {
        if len > 1 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len > 1 {
            self.index = (self.index + len - 1) % len;
        }
    }

    /// Account for the remix at `removed` having been taken out of `job`.
    /// Removing the current result or one before it steps back by one; the
    /// cursor stays on the same image otherwise.
    pub fn result_removed(&mut self, job: &Job, removed: usize) {
        if removed > 0 && removed <= self.index {
            self.index -= 1;
        }
        self.index = self.index.min(job.results.len().saturating_sub(1));
        self.observed = Some((job.id, job.results.len()));
    }
}
