// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector selection and tuning

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::detection::onnx::{
    DetectorParams, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_IOU_THRESHOLD, DEFAULT_MAX_DETECTIONS,
};
use crate::vision::DETECTION_INPUT_SIZE;

pub const DEFAULT_MODEL_PATH: &str = "./models/yolov8n.onnx";

/// What to serve when the detection model cannot be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FallbackMode {
    /// Report "model not loaded" on every detect call
    #[default]
    Degraded,
    /// Serve flagged random detections
    Synthetic,
}

/// Arguments controlling how the detector is built at startup
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Path to the YOLOv8 ONNX export
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Label file, one class name per line (defaults to COCO)
    #[arg(long, env = "LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Minimum class score for a box to be kept
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub confidence_threshold: f32,

    /// IoU above which overlapping boxes of one class are suppressed
    #[arg(long, env = "IOU_THRESHOLD", default_value_t = DEFAULT_IOU_THRESHOLD)]
    pub iou_threshold: f32,

    /// Square model input size in pixels
    #[arg(long, env = "INPUT_SIZE", default_value_t = DETECTION_INPUT_SIZE)]
    pub input_size: u32,

    /// Maximum boxes returned per image
    #[arg(long, env = "MAX_DETECTIONS", default_value_t = DEFAULT_MAX_DETECTIONS)]
    pub max_detections: usize,

    /// Behaviour when the model fails to load
    #[arg(long, env = "DETECTOR_FALLBACK", value_enum, default_value_t = FallbackMode::Degraded)]
    pub fallback: FallbackMode,

    /// Lower bound of the synthetic detector's simulated latency
    #[arg(long, env = "SYNTHETIC_DELAY_MIN_MS", default_value_t = 1000)]
    pub synthetic_delay_min_ms: u64,

    /// Upper bound of the synthetic detector's simulated latency
    #[arg(long, env = "SYNTHETIC_DELAY_MAX_MS", default_value_t = 2000)]
    pub synthetic_delay_max_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            input_size: DETECTION_INPUT_SIZE,
            max_detections: DEFAULT_MAX_DETECTIONS,
            fallback: FallbackMode::Degraded,
            synthetic_delay_min_ms: 1000,
            synthetic_delay_max_ms: 2000,
        }
    }
}

impl DetectorConfig {
    pub fn params(&self) -> DetectorParams {
        DetectorParams {
            input_size: self.input_size,
            confidence_threshold: self.confidence_threshold,
            iou_threshold: self.iou_threshold,
            max_detections: self.max_detections,
        }
    }

    pub fn synthetic_delay_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.synthetic_delay_min_ms),
            Duration::from_millis(self.synthetic_delay_max_ms),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(anyhow!(
                "iou_threshold must be within [0, 1], got {}",
                self.iou_threshold
            ));
        }
        if self.input_size == 0 || self.input_size % 32 != 0 {
            return Err(anyhow!(
                "input_size must be a positive multiple of 32, got {}",
                self.input_size
            ));
        }
        if self.max_detections == 0 {
            return Err(anyhow!("max_detections must be at least 1"));
        }
        if self.synthetic_delay_min_ms > self.synthetic_delay_max_ms {
            return Err(anyhow!(
                "synthetic delay min ({}ms) exceeds max ({}ms)",
                self.synthetic_delay_min_ms,
                self.synthetic_delay_max_ms
            ));
        }
        Ok(())
    }
}
