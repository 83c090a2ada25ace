// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detection on ONNX Runtime
//!
//! The model runs on CPU. The session is not safe for concurrent `run`, so it
//! sits behind a mutex and every inference executes on the blocking pool.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

use super::detector::ObjectDetector;
use super::error::DetectionError;
use super::labels::LabelTable;
use super::postprocess::{decode_yolo_output, nms, resolve_detections};
use super::types::{Detection, RawDetection};
use crate::vision::{decode_image_bytes, letterbox, Letterbox, DETECTION_INPUT_SIZE};

/// Default minimum class score for a box to survive decoding
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Default IoU above which same-class boxes are suppressed
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.45;

/// Default cap on boxes returned per image
pub const DEFAULT_MAX_DETECTIONS: usize = 300;

/// Tunables for the model-backed detector
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorParams {
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_size: DETECTION_INPUT_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            max_detections: DEFAULT_MAX_DETECTIONS,
        }
    }
}

/// YOLOv8 detector backed by an ONNX export
#[derive(Clone)]
pub struct OnnxDetector {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    labels: Arc<LabelTable>,
    params: DetectorParams,
}

impl std::fmt::Debug for OnnxDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxDetector")
            .field("input_name", &self.input_name)
            .field("labels", &self.labels.len())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl OnnxDetector {
    /// Load the detection model from a file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        labels: LabelTable,
        params: DetectorParams,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        if let Some(output) = session.outputs.first() {
            debug!("Detection model output: {} {:?}", output.name, output.output_type);
        }

        info!(
            "✅ Detection model loaded (input: {}, {} labels, CPU-only)",
            input_name,
            labels.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels: Arc::new(labels),
            params,
        })
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Decode, letterbox, infer and post-process one image
    ///
    /// Blocking; call from the blocking pool.
    fn detect_blocking(&self, image: &[u8]) -> Result<Vec<Detection>, DetectionError> {
        let start = Instant::now();
        let (decoded, info) = decode_image_bytes(image)?;
        debug!(
            "Decoded image: {}x{}, {} bytes",
            info.width, info.height, info.size_bytes
        );

        let lb = letterbox(&decoded, self.params.input_size);
        let raw = self.run_model(&lb)?;
        let kept = nms(raw, self.params.iou_threshold, self.params.max_detections);
        let detections = resolve_detections(kept, &self.labels)?;

        debug!(
            "Inference complete: {} detections in {}ms",
            detections.len(),
            start.elapsed().as_millis()
        );

        Ok(detections)
    }

    fn run_model(&self, lb: &Letterbox) -> Result<Vec<RawDetection>, DetectionError> {
        let input_value = Value::from_array(lb.tensor.clone())
            .map_err(|e| DetectionError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectionError::Inference("Detection session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| DetectionError::Inference(format!("Detection inference failed: {}", e)))?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| DetectionError::Inference(format!("Failed to extract output tensor: {}", e)))?;

        decode_yolo_output(output_tensor.view(), lb, self.params.confidence_threshold)
    }
}

#[async_trait]
impl ObjectDetector for OnnxDetector {
    fn name(&self) -> &str {
        "yolov8-onnx"
    }

    fn is_model_backed(&self) -> bool {
        true
    }

    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, DetectionError> {
        let detector = self.clone();
        tokio::task::spawn_blocking(move || detector.detect_blocking(&image))
            .await
            .map_err(|e| DetectionError::Inference(format!("Detection task failed: {}", e)))?
    }
}
