//! Test helper utilities for driving the router in-process
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use banana_scan::app_state::AppState;
use banana_scan::config::{AppConfig, DEFAULT_PROMPT};
use banana_scan::models::generation::JobDetail;
use banana_scan::models::job::ImagePayload;
use banana_scan::routes;
use banana_scan::services::generator::{GenerationError, ImageGenerator};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tower::ServiceExt;
use uuid::Uuid;

use crate::fixtures::PNG_BYTES;

const BOUNDARY: &str = "banana-scan-test-boundary";

/// Stand-in for the Gemini client. Echoes the prompt into the image bytes so
/// tests can tell results apart.
pub struct FakeGenerator {
    fail: AtomicBool,
    held: bool,
    release: Semaphore,
    calls: AtomicUsize,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl FakeGenerator {
    /// Answers immediately.
    pub fn instant() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    /// Blocks every call until [`FakeGenerator::release`] is called.
    pub fn held() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    fn build(held: bool) -> Self {
        Self {
            fail: AtomicBool::new(false),
            held,
            release: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn release(&self, n: usize) {
        self.release.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..400 {
            if self.calls() >= n {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("generator saw {} calls, expected {}", self.calls(), n);
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        _source: &ImagePayload,
        prompt: &str,
    ) -> Result<ImagePayload, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.held {
            if let Ok(permit) = self.release.acquire().await {
                permit.forget();
            }
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::NoImage);
        }
        let mut bytes = PNG_BYTES.to_vec();
        bytes.extend_from_slice(prompt.as_bytes());
        Ok(ImagePayload::new(bytes, "image/png"))
    }
}

pub fn test_config(capacity: usize) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: "test-model".to_string(),
        gemini_base_url: "http://localhost:0".to_string(),
        max_concurrent_generations: capacity,
        max_upload_bytes: 1024 * 1024,
        default_prompt: DEFAULT_PROMPT.to_string(),
    }
}

pub fn test_app(generator: Arc<FakeGenerator>, capacity: usize) -> (Router, AppState) {
    let state = AppState::new(&test_config(capacity), generator);
    (routes::api_router(state.clone()), state)
}

/// Build a multipart upload with a single `image` part.
pub fn upload_request(bytes: &[u8], content_type: &str) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image\"; filename=\"capture.png\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/jobs")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and return the status and raw body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

pub async fn send_json<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> (StatusCode, T) {
    let (status, body) = send(app, request).await;
    let parsed = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "invalid JSON ({}): {}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

pub async fn get_job(app: &Router, job_id: Uuid) -> Option<JobDetail> {
    let (status, body) = send(app, empty_request(Method::GET, &format!("/api/v1/jobs/{}", job_id))).await;
    match status {
        StatusCode::OK => Some(serde_json::from_slice(&body).unwrap()),
        StatusCode::NOT_FOUND => None,
        other => panic!("unexpected status {}", other),
    }
}

/// Poll a job until `done` holds (or it disappears, which `done` sees as None).
pub async fn wait_for_job<F>(app: &Router, job_id: Uuid, done: F) -> Option<JobDetail>
where
    F: Fn(Option<&JobDetail>) -> bool,
{
    for _ in 0..400 {
        let job = get_job(app, job_id).await;
        if done(job.as_ref()) {
            return job;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("job {} did not reach the expected state", job_id);
}
