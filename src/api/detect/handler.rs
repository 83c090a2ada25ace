// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detect endpoint handler

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartRejection;
use axum_extra::extract::Multipart;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::request::{read_upload, UploadedImage};
use super::response::DetectionResponse;
use crate::analysis::SceneClassifier;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::detection::ObjectDetector;

/// POST /detect - Detect objects in an uploaded image
///
/// Accepts a multipart upload with the image in the `file` field and
/// returns the detections with a scene analysis.
///
/// # Response
/// - `filename`: Upload name echoed back
/// - `detections`: `{label, confidence, box}` in detector order
/// - `message`: "Detection successful"
/// - `analysis`: `{scene_type, summary}`
/// - `synthetic`: present and `true` only for fabricated detections
///
/// When no detector is installed the body is `{error, message}` with 200.
///
/// # Errors
/// - 400 Bad Request: missing `file`, malformed multipart, undecodable image
/// - 413 Payload Too Large: upload above the configured limit
/// - 500 Internal Server Error: inference failed or label table mismatch
/// - 504 Gateway Timeout: detector did not finish in time
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    // 1. Check a detector is installed; degraded mode answers before the body is read
    let detector = match state.detector_manager.detector() {
        Ok(detector) => detector,
        Err(e) => {
            debug!("[{}] Detect request in degraded mode: {}", request_id, e);
            return ApiError::from(e).into_response();
        }
    };

    // 2. Validate request
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("[{}] Rejected detect request: {}", request_id, rejection.body_text());
            return ApiError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    // 3. Read the uploaded image
    let upload = match read_upload(&mut multipart, state.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("[{}] Invalid upload: {}", request_id, e);
            return e.into_response();
        }
    };

    // 4. Detect and classify
    match run_detection(detector, &state.classifier, upload, state.detect_timeout, request_id).await
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Detect, classify and assemble the response for one upload
pub async fn run_detection(
    detector: Arc<dyn ObjectDetector>,
    classifier: &SceneClassifier,
    upload: UploadedImage,
    detect_timeout: Duration,
    request_id: Uuid,
) -> Result<DetectionResponse, ApiError> {
    let start = Instant::now();
    let UploadedImage { filename, bytes } = upload;

    debug!(
        "[{}] Running {} on '{}' ({} bytes)",
        request_id,
        detector.name(),
        filename,
        bytes.len()
    );

    // 1. Run the detector under the deadline
    let detections = match tokio::time::timeout(detect_timeout, detector.detect(bytes)).await {
        Ok(Ok(detections)) => detections,
        Ok(Err(e)) => {
            warn!("[{}] Detection failed for '{}': {}", request_id, filename, e);
            return Err(e.into());
        }
        Err(_) => {
            warn!(
                "[{}] Detection timed out after {}s for '{}'",
                request_id,
                detect_timeout.as_secs_f32(),
                filename
            );
            return Err(ApiError::Timeout);
        }
    };

    // 2. Classify the scene
    let analysis = classifier.classify_detections(&detections);

    info!(
        "[{}] Detection complete: '{}', {} objects, {}, {}ms",
        request_id,
        filename,
        detections.len(),
        analysis.scene_type,
        start.elapsed().as_millis()
    );

    // 3. Build response
    Ok(DetectionResponse::new(
        filename,
        detections,
        analysis,
        !detector.is_model_backed(),
    ))
}
