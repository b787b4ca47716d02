//! Banana Scan
//!
//! This library provides the core of the banana-scan service: an in-memory
//! workspace of image jobs, a concurrency-gated pipeline that sends captures
//! to the Gemini image model, and the HTTP API that drives both.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
