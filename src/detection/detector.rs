// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector capability shared by the model-backed and synthetic backends

use async_trait::async_trait;
use bytes::Bytes;

use super::error::DetectionError;
use super::types::Detection;

/// Turns encoded image bytes into detections
///
/// Implementations must be safe to call from many requests at once. A
/// backend that cannot run concurrently serializes access internally.
/// Failures are returned as-is; implementations do not retry.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// False for backends that fabricate their output
    fn is_model_backed(&self) -> bool;

    /// Run detection over one encoded image
    ///
    /// Zero detections is a valid result and distinct from failure.
    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, DetectionError>;
}
