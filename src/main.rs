use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use banana_scan::app_state::AppState;
use banana_scan::config::AppConfig;
use banana_scan::routes::{self, metrics::MetricsState};
use banana_scan::services::gemini::GeminiClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing banana-scan server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_counter!(
        "generation_requests_total",
        "Generation requests received by the gate"
    );
    metrics::describe_counter!(
        "generation_rejected_total",
        "Generation requests rejected because the gate was full"
    );
    metrics::describe_counter!(
        "generation_completed_total",
        "Generations that returned an image"
    );
    metrics::describe_counter!(
        "generation_failed_total",
        "Generations that failed at the image service"
    );
    metrics::describe_gauge!(
        "generation_in_flight",
        "Generation requests currently outstanding"
    );
    metrics::describe_histogram!(
        "generation_seconds",
        "Time spent waiting on the image generation service"
    );

    tracing::info!(
        model = %config.gemini_model,
        capacity = config.max_concurrent_generations,
        "Initializing Gemini image client"
    );
    let generator = GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_model,
        &config.gemini_api_key,
    );

    let state = AppState::new(&config, Arc::new(generator));
    let metrics_state = MetricsState {
        handle: prometheus_handle,
        gate: state.gate.clone(),
    };

    let app = routes::api_router(state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(metrics_state),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes));

    tracing::info!("Starting banana-scan on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
