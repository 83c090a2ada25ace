// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use mini_detection_node::api::create_app;
use mini_detection_node::detection::{DetectorManager, SyntheticDetector};
use std::sync::Arc;
use std::time::Duration;

use super::common::{app_with_outcome, body_json, send, state_with, StubOutcome};

fn root_request() -> Request<Body> {
    Request::builder().uri("/").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_root_reports_model_loaded() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let response = send(app, root_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Mini Detection System API is running");
    assert_eq!(json["model_loaded"], true);
}

#[tokio::test]
async fn test_root_in_degraded_mode() {
    let app = create_app(state_with(DetectorManager::unavailable("no weights")));
    let json = body_json(send(app, root_request()).await).await;
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn test_root_with_synthetic_fallback() {
    let detector = SyntheticDetector::with_seed(1, Duration::ZERO, Duration::ZERO);
    let app = create_app(state_with(DetectorManager::with_detector(Arc::new(detector))));
    let json = body_json(send(app, root_request()).await).await;
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_credentials() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://dashboard.example")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://dashboard.example"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_preflight_for_detect() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/detect")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
