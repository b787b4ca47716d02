use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    gate::GenerationGate,
    generator::ImageGenerator,
    session::{Session, SharedSession},
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub gate: Arc<GenerationGate>,
    pub default_prompt: Arc<str>,
}

impl AppState {
    pub fn new(config: &AppConfig, generator: Arc<dyn ImageGenerator>) -> Self {
        let session = Session::shared();
        let gate = GenerationGate::new(
            generator,
            session.clone(),
            config.max_concurrent_generations,
        );
        Self {
            session,
            gate: Arc::new(gate),
            default_prompt: config.default_prompt.as_str().into(),
        }
    }
}
