// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use mini_detection_node::api::{create_app, AppState};
use mini_detection_node::detection::{DetectorManager, SyntheticDetector, SYNTHETIC_LABELS};
use std::sync::Arc;
use std::time::Duration;

use super::common::{
    app_with_detector, app_with_outcome, body_json, detect_request, detection, png_bytes, send,
    state_with, StubOutcome, BOUNDARY,
};

fn synthetic_app() -> axum::Router {
    let detector = SyntheticDetector::with_seed(11, Duration::ZERO, Duration::ZERO);
    app_with_detector(Arc::new(detector))
}

#[tokio::test]
async fn test_detect_success_shape() {
    let app = app_with_outcome(StubOutcome::Detections(vec![
        detection("person", 0.91),
        detection("car", 0.42),
        detection("person", 0.30),
    ]));

    let response = send(app, detect_request("file", "street.png", &png_bytes(8, 8))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["filename"], "street.png");
    assert_eq!(json["message"], "Detection successful");
    assert_eq!(json["detections"].as_array().unwrap().len(), 3);
    assert_eq!(json["detections"][0]["label"], "person");
    assert_eq!(
        json["detections"][0]["box"],
        serde_json::json!([10.0, 20.0, 40.0, 60.0])
    );
    assert_eq!(json["analysis"]["scene_type"], "Urban Street / Traffic");
    assert_eq!(
        json["analysis"]["summary"],
        "Detected 3 objects. High likelihood of pedestrian activity near vehicles. Caution advised in this sector."
    );
    assert!(json.get("synthetic").is_none());
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_zero_detections_is_empty_scene() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let json = body_json(send(app, detect_request("file", "blank.png", &png_bytes(4, 4))).await).await;

    assert_eq!(json["detections"], serde_json::json!([]));
    assert_eq!(json["analysis"]["scene_type"], "Empty Scene");
    assert_eq!(
        json["analysis"]["summary"],
        "No significant objects detected in the current visual field. System remaining in standby."
    );
}

#[tokio::test]
async fn test_degraded_mode_is_distinct_from_empty_result() {
    let app = create_app(state_with(DetectorManager::unavailable("weights missing")));
    let response = send(app, detect_request("file", "street.png", &png_bytes(4, 4))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["error"], "AI model not loaded");
    assert_eq!(json["message"], "Backend is running in mock mode fallback");
    assert!(json.get("detections").is_none());
    assert!(json.get("analysis").is_none());
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_degraded_mode_ignores_malformed_body() {
    let app = create_app(state_with(DetectorManager::unavailable("weights missing")));
    let request = Request::builder()
        .method("POST")
        .uri("/detect")
        .body(Body::from("not multipart"))
        .unwrap();

    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["error"], "AI model not loaded");
}

#[tokio::test]
async fn test_synthetic_fallback_is_flagged() {
    let response = send(synthetic_app(), detect_request("file", "a.png", &png_bytes(64, 48))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["synthetic"], true);
    assert_eq!(json["message"], "Detection successful (synthetic fallback)");

    let detections = json["detections"].as_array().unwrap();
    assert!((1..=5).contains(&detections.len()));
    for det in detections {
        let label = det["label"].as_str().unwrap();
        assert!(SYNTHETIC_LABELS.contains(&label));
        assert!(det["box"][2].as_f64().unwrap() >= 0.0);
        assert!(det["box"][3].as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn test_corrupt_image_is_bad_request() {
    let response = send(synthetic_app(), detect_request("file", "broken.png", b"definitely not pixels")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "decode_error");
}

#[tokio::test]
async fn test_truncated_png_is_bad_request() {
    // Valid signature, body cut off inside the header chunk
    let truncated = png_bytes(8, 8)[..20].to_vec();
    let response = send(synthetic_app(), detect_request("file", "cut.png", &truncated)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "decode_error");
    assert!(json["message"].as_str().unwrap().contains("decode"));
}

#[tokio::test]
async fn test_file_part_without_filename_is_rejected() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\nplain value\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method("POST")
        .uri("/detect")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["details"]["field"], "file");
}

#[tokio::test]
async fn test_missing_file_field() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let response = send(app, detect_request("image", "a.png", &png_bytes(4, 4))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["details"]["field"], "file");
}

#[tokio::test]
async fn test_non_multipart_request() {
    let app = app_with_outcome(StubOutcome::Detections(vec![]));
    let request = Request::builder()
        .method("POST")
        .uri("/detect")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn test_upload_over_limit() {
    let manager = DetectorManager::with_detector(Arc::new(super::common::StubDetector::new(
        StubOutcome::Detections(vec![]),
    )));
    let app = create_app(AppState::new(manager, Duration::from_secs(5), 128));

    let response = send(app, detect_request("file", "big.bin", &vec![0u8; 4096])).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"], "payload_too_large");
}

#[tokio::test]
async fn test_label_table_mismatch_is_server_error() {
    let app = app_with_outcome(StubOutcome::UnknownClass);
    let response = send(app, detect_request("file", "a.png", &png_bytes(4, 4))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "internal_error");
}

#[tokio::test]
async fn test_slow_detector_times_out() {
    let manager = DetectorManager::with_detector(Arc::new(super::common::StubDetector::new(
        StubOutcome::Slow(Duration::from_secs(5)),
    )));
    let app = create_app(AppState::new(manager, Duration::from_millis(50), 1024 * 1024));

    let response = send(app, detect_request("file", "a.png", &png_bytes(4, 4))).await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body_json(response).await["error"], "timeout");
}

#[tokio::test]
async fn test_concurrent_requests_share_detector() {
    let app = synthetic_app();
    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("frame-{}.png", i);
            let response = send(app, detect_request("file", &name, &png_bytes(16, 16))).await;
            (name, body_json(response).await)
        }));
    }

    for handle in handles {
        let (name, json) = handle.await.unwrap();
        assert_eq!(json["filename"], name);
        assert_eq!(json["synthetic"], true);
    }
}
