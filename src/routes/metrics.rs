use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::services::gate::GenerationGate;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: Arc<PrometheusHandle>,
    pub gate: Arc<GenerationGate>,
}

/// Prometheus scrape endpoint.
/// Refreshes the in-flight gauge so an idle gate still reports its real load.
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> String {
    metrics::gauge!("generation_in_flight").set(state.gate.in_flight() as f64);
    state.handle.render()
}
