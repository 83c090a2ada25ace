// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Startup selection of the detector backend

use std::sync::Arc;
use tracing::{info, warn};

use super::detector::ObjectDetector;
use super::error::DetectionError;
use super::labels::LabelTable;
use super::onnx::OnnxDetector;
use super::synthetic::SyntheticDetector;
use crate::config::{DetectorConfig, FallbackMode};

/// Information about the installed detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorInfo {
    /// Backend name
    pub name: String,
    /// Whether output comes from a real model
    pub model_backed: bool,
}

/// Owns the process-wide detector
///
/// Built once at startup and shared read-only by every request. `detector`
/// is `None` when the model failed to load and no fallback was configured.
#[derive(Clone)]
pub struct DetectorManager {
    detector: Option<Arc<dyn ObjectDetector>>,
    load_error: Option<String>,
}

impl std::fmt::Debug for DetectorManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorManager")
            .field("detector", &self.info())
            .field("load_error", &self.load_error)
            .finish()
    }
}

impl DetectorManager {
    /// Load the configured model, falling back as configured
    ///
    /// Never fails: a missing or broken model leaves the manager degraded or
    /// synthetic, and the reason is kept for the status log.
    pub async fn new(config: &DetectorConfig) -> Self {
        let labels = match &config.labels_path {
            Some(path) => LabelTable::from_file(path),
            None => Ok(LabelTable::coco()),
        };

        let loaded = match labels {
            Ok(labels) => {
                let model_path = config.model_path.clone();
                let params = config.params();
                tokio::task::spawn_blocking(move || OnnxDetector::new(model_path, labels, params))
                    .await
                    .map_err(anyhow::Error::from)
                    .and_then(|result| result)
            }
            Err(e) => Err(e),
        };

        match loaded {
            Ok(detector) => {
                info!("✅ Object detector ready: {}", detector.name());
                Self::with_detector(Arc::new(detector))
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(
                    "⚠️ Failed to load detection model from {}: {}",
                    config.model_path.display(),
                    reason
                );
                match config.fallback {
                    FallbackMode::Synthetic => {
                        let (min, max) = config.synthetic_delay_bounds();
                        warn!("⚠️ Serving synthetic detections; responses will be flagged");
                        Self {
                            detector: Some(Arc::new(SyntheticDetector::new(min, max))),
                            load_error: Some(reason),
                        }
                    }
                    FallbackMode::Degraded => {
                        warn!("⚠️ No detector installed; /detect will report model not loaded");
                        Self::unavailable(reason)
                    }
                }
            }
        }
    }

    /// Wrap an already-built detector
    pub fn with_detector(detector: Arc<dyn ObjectDetector>) -> Self {
        Self {
            detector: Some(detector),
            load_error: None,
        }
    }

    /// A manager with no detector at all
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            detector: None,
            load_error: Some(reason.into()),
        }
    }

    pub fn detector(&self) -> Result<Arc<dyn ObjectDetector>, DetectionError> {
        self.detector.clone().ok_or_else(|| {
            DetectionError::ModelUnavailable(
                self.load_error
                    .clone()
                    .unwrap_or_else(|| "no detector configured".to_string()),
            )
        })
    }

    /// True only when a real model initialised
    pub fn model_loaded(&self) -> bool {
        self.detector
            .as_ref()
            .map(|d| d.is_model_backed())
            .unwrap_or(false)
    }

    pub fn is_synthetic(&self) -> bool {
        self.detector
            .as_ref()
            .map(|d| !d.is_model_backed())
            .unwrap_or(false)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn info(&self) -> Option<DetectorInfo> {
        self.detector.as_ref().map(|d| DetectorInfo {
            name: d.name().to_string(),
            model_backed: d.is_model_backed(),
        })
    }
}
