use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::models::job::{ImagePayload, JobId, JobResult};
use crate::services::generator::{GenerationError, ImageGenerator};
use crate::services::session::{self, SharedSession};
use crate::services::store::StoreError;

pub const MAX_CONCURRENT: usize = 8;

pub const CAPACITY_NOTICE: &str = "Hold on! Too many generations in progress.";
pub const FAILURE_NOTICE: &str = "System error. Please try again.";

/// What the caller wants generated.
#[derive(Debug, Clone)]
pub enum GenerationIntent {
    /// A fresh capture; creates a job.
    NewJob { source: ImagePayload, prompt: String },
    /// A follow-up on an existing job's base image.
    Remix {
        job_id: JobId,
        prompt: String,
        preset_label: Option<String>,
    },
}

/// How an admitted generation resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Applied { job_id: JobId, index: usize },
    /// The target job was deleted while the request was in flight.
    Discarded { job_id: JobId },
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("{}", CAPACITY_NOTICE)]
    CapacityExceeded,

    #[error("{}", FAILURE_NOTICE)]
    GenerationFailed(#[source] GenerationError),

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Admission control for the image generation service.
///
/// Holds a fixed number of slots; a request either takes one immediately or
/// is rejected with [`GateError::CapacityExceeded`]. The slot is released
/// when the request resolves, however it resolves.
pub struct GenerationGate {
    slots: Arc<Semaphore>,
    capacity: usize,
    generator: Arc<dyn ImageGenerator>,
    session: SharedSession,
}

impl GenerationGate {
    pub fn new(generator: Arc<dyn ImageGenerator>, session: SharedSession, capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            generator,
            session,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }

    /// Validate and admit a request, reserving a slot and preparing the
    /// workspace. Nothing is mutated when this returns an error.
    pub fn begin(&self, intent: GenerationIntent) -> Result<Generation, GateError> {
        metrics::counter!("generation_requests_total").increment(1);

        match intent {
            GenerationIntent::NewJob { source, prompt } => {
                if prompt.trim().is_empty() {
                    return Err(GateError::EmptyPrompt);
                }
                let permit = self.admit()?;
                let job_id = session::lock(&self.session).create_job(source.clone(), &prompt);
                tracing::info!(%job_id, in_flight = self.in_flight(), "Admitted new job generation");
                Ok(self.generation(permit, Target::NewJob(job_id), source, prompt, None))
            }
            GenerationIntent::Remix {
                job_id,
                prompt,
                preset_label,
            } => {
                if prompt.trim().is_empty() {
                    return Err(GateError::EmptyPrompt);
                }
                let mut session = session::lock(&self.session);
                let job = session.job(job_id).ok_or(StoreError::NotFound(job_id))?;
                let source = job
                    .base_result()
                    .map(|r| r.image.clone())
                    .ok_or_else(|| {
                        StoreError::InvalidOperation("Job has no image to remix yet".to_string())
                    })?;
                if let Some(label) = &preset_label {
                    if job.pending_remix_labels.contains(label) {
                        return Err(StoreError::InvalidOperation(format!(
                            "Preset '{}' is already generating",
                            label
                        ))
                        .into());
                    }
                }

                let permit = self.admit()?;
                if let Some(label) = &preset_label {
                    session.mark_remix_pending(job_id, label);
                }
                drop(session);

                tracing::info!(
                    %job_id,
                    preset = preset_label.as_deref().unwrap_or("custom"),
                    in_flight = self.in_flight(),
                    "Admitted remix generation"
                );
                Ok(self.generation(permit, Target::Remix(job_id), source, prompt, preset_label))
            }
        }
    }

    /// Admit and run to completion.
    pub async fn submit(&self, intent: GenerationIntent) -> Result<GenerationOutcome, GateError> {
        self.begin(intent)?.run().await
    }

    fn admit(&self) -> Result<OwnedSemaphorePermit, GateError> {
        match self.slots.clone().try_acquire_owned() {
            Ok(permit) => {
                metrics::gauge!("generation_in_flight").set(self.in_flight() as f64);
                Ok(permit)
            }
            Err(_) => {
                metrics::counter!("generation_rejected_total").increment(1);
                tracing::warn!(capacity = self.capacity, "Generation rejected, gate is full");
                Err(GateError::CapacityExceeded)
            }
        }
    }

    fn generation(
        &self,
        permit: OwnedSemaphorePermit,
        target: Target,
        source: ImagePayload,
        prompt: String,
        preset_label: Option<String>,
    ) -> Generation {
        Generation {
            slot: Slot {
                permit: Some(permit),
                slots: self.slots.clone(),
                capacity: self.capacity,
                session: self.session.clone(),
                job_id: target.job_id(),
                preset_label,
            },
            target,
            source,
            prompt,
            generator: self.generator.clone(),
            session: self.session.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    NewJob(JobId),
    Remix(JobId),
}

impl Target {
    fn job_id(self) -> JobId {
        match self {
            Target::NewJob(id) | Target::Remix(id) => id,
        }
    }
}

/// An admitted request that owns its slot until it resolves.
pub struct Generation {
    slot: Slot,
    target: Target,
    source: ImagePayload,
    prompt: String,
    generator: Arc<dyn ImageGenerator>,
    session: SharedSession,
}

impl Generation {
    pub fn job_id(&self) -> JobId {
        self.target.job_id()
    }

    /// Call the generation service and apply the result to the workspace.
    pub async fn run(self) -> Result<GenerationOutcome, GateError> {
        let job_id = self.target.job_id();
        let started = Instant::now();
        let result = self.generator.generate(&self.source, &self.prompt).await;
        let elapsed = started.elapsed();
        metrics::histogram!("generation_seconds").record(elapsed.as_secs_f64());

        let outcome = {
            let mut session = session::lock(&self.session);
            match result {
                Ok(image) => {
                    metrics::counter!("generation_completed_total").increment(1);
                    match session.append_result(job_id, JobResult::new(image, self.prompt.clone())) {
                        Ok(index) => {
                            tracing::info!(
                                %job_id,
                                index,
                                duration_ms = elapsed.as_millis() as u64,
                                "Generation complete"
                            );
                            Ok(GenerationOutcome::Applied { job_id, index })
                        }
                        Err(_) => {
                            tracing::debug!(%job_id, "Job removed while generating, dropping result");
                            Ok(GenerationOutcome::Discarded { job_id })
                        }
                    }
                }
                Err(e) => {
                    metrics::counter!("generation_failed_total").increment(1);
                    tracing::warn!(
                        %job_id,
                        error = %e,
                        duration_ms = elapsed.as_millis() as u64,
                        "Generation failed"
                    );
                    if let Target::NewJob(_) = self.target {
                        session.remove_job(job_id);
                    }
                    session.post_notice(FAILURE_NOTICE);
                    Err(GateError::GenerationFailed(e))
                }
            }
        };

        drop(self.slot);
        outcome
    }
}

/// Releases the gate slot and the job's pending preset label when dropped,
/// including when the owning future is cancelled or panics.
struct Slot {
    permit: Option<OwnedSemaphorePermit>,
    slots: Arc<Semaphore>,
    capacity: usize,
    session: SharedSession,
    job_id: JobId,
    preset_label: Option<String>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        if let Some(label) = self.preset_label.take() {
            session::lock(&self.session).clear_remix_pending(self.job_id, &label);
        }
        drop(self.permit.take());
        let in_flight = self.capacity - self.slots.available_permits();
        metrics::gauge!("generation_in_flight").set(in_flight as f64);
    }
}
