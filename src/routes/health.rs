use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::services::session;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize, Deserialize)]
pub struct HealthChecks {
    pub generation: GateHealth,
    pub jobs: usize,
}

#[derive(Serialize, Deserialize)]
pub struct GateHealth {
    pub status: String,
    pub in_flight: usize,
    pub capacity: usize,
}

/// GET /health — liveness plus current generation load.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let in_flight = state.gate.in_flight();
    let capacity = state.gate.capacity();
    let jobs = session::lock(&state.session).store().len();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            generation: GateHealth {
                status: if in_flight >= capacity {
                    "saturated".to_string()
                } else {
                    "ok".to_string()
                },
                in_flight,
                capacity,
            },
            jobs,
        },
    })
}
