// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::detect::detect_handler;
use super::root::root_handler;
use crate::analysis::SceneClassifier;
use crate::detection::DetectorManager;

/// Allowance for multipart boundaries and part headers on top of the file
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub detector_manager: Arc<DetectorManager>,
    pub classifier: Arc<SceneClassifier>,
    pub detect_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        detector_manager: DetectorManager,
        detect_timeout: Duration,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            detector_manager: Arc::new(detector_manager),
            classifier: Arc::new(SceneClassifier::default()),
            detect_timeout,
            max_upload_bytes,
        }
    }
}

/// Build the router
///
/// Cross-origin access is open to any origin, method and header, with
/// credentials. This is a development posture.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(root_handler))
        .route("/detect", post(detect_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
