// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection
//!
//! One capability (`ObjectDetector`) with two backends:
//! - `OnnxDetector`: YOLOv8 on ONNX Runtime (CPU)
//! - `SyntheticDetector`: random detections for running without weights
//!
//! `DetectorManager` picks one at startup.

pub mod detector;
pub mod error;
pub mod labels;
pub mod manager;
pub mod onnx;
pub mod postprocess;
pub mod synthetic;
pub mod types;

pub use detector::ObjectDetector;
pub use error::DetectionError;
pub use labels::{LabelTable, COCO_CLASSES};
pub use manager::{DetectorInfo, DetectorManager};
pub use onnx::{DetectorParams, OnnxDetector};
pub use postprocess::{decode_yolo_output, iou, nms, resolve_detections};
pub use synthetic::{SyntheticDetector, SYNTHETIC_LABELS};
pub use types::{corners_to_box, Detection, RawDetection};
