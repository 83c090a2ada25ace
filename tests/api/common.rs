// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared helpers for the HTTP tests

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use mini_detection_node::api::{create_app, AppState};
use mini_detection_node::detection::{Detection, DetectionError, DetectorManager, ObjectDetector};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const BOUNDARY: &str = "mini-detection-test-boundary";

/// What the stub detector does when called
#[derive(Clone)]
pub enum StubOutcome {
    Detections(Vec<Detection>),
    UnknownClass,
    Slow(Duration),
}

pub struct StubDetector {
    outcome: StubOutcome,
}

impl StubDetector {
    pub fn new(outcome: StubOutcome) -> Self {
        Self { outcome }
    }
}

#[async_trait]
impl ObjectDetector for StubDetector {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_model_backed(&self) -> bool {
        true
    }

    async fn detect(&self, _image: Bytes) -> Result<Vec<Detection>, DetectionError> {
        match &self.outcome {
            StubOutcome::Detections(detections) => Ok(detections.clone()),
            StubOutcome::UnknownClass => Err(DetectionError::UnknownClassIndex {
                index: 80,
                table_len: 80,
            }),
            StubOutcome::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(vec![])
            }
        }
    }
}

pub fn state_with(manager: DetectorManager) -> AppState {
    AppState::new(manager, Duration::from_secs(5), 1024 * 1024)
}

pub fn app_with_detector(detector: Arc<dyn ObjectDetector>) -> Router {
    create_app(state_with(DetectorManager::with_detector(detector)))
}

pub fn app_with_outcome(outcome: StubOutcome) -> Router {
    app_with_detector(Arc::new(StubDetector::new(outcome)))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 120, 200]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Build a multipart body with one part
pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn detect_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/detect")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, filename, data)))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn detection(label: &str, confidence: f32) -> Detection {
    Detection {
        label: label.to_string(),
        confidence,
        bbox: [10.0, 20.0, 40.0, 60.0],
    }
}
