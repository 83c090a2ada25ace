// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 output decoding, NMS and label resolution

use ndarray::{ArrayViewD, IxDyn};
use tracing::{debug, warn};

use super::error::DetectionError;
use super::labels::LabelTable;
use super::types::{Detection, RawDetection};
use crate::vision::Letterbox;

/// Decode a YOLOv8 output tensor of shape `[1, 4 + C, N]`
///
/// Each of the N anchors carries centre-x, centre-y, width and height in
/// model input pixels followed by C class scores. Anchors whose best class
/// score is below `confidence_threshold` are dropped. Surviving boxes are
/// mapped back into original image space through the letterbox transform.
pub fn decode_yolo_output(
    output: ArrayViewD<f32>,
    letterbox: &Letterbox,
    confidence_threshold: f32,
) -> Result<Vec<RawDetection>, DetectionError> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 || shape[1] < 5 {
        return Err(DetectionError::Inference(format!(
            "Unexpected detector output shape: {:?}, expected [1, 4 + classes, anchors]",
            shape
        )));
    }

    let num_classes = shape[1] - 4;
    let num_anchors = shape[2];
    let mut candidates = Vec::new();

    for anchor in 0..num_anchors {
        let mut best_class = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for class in 0..num_classes {
            let score = output[IxDyn(&[0, 4 + class, anchor])];
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }

        if best_score < confidence_threshold {
            continue;
        }

        let cx = output[IxDyn(&[0, 0, anchor])];
        let cy = output[IxDyn(&[0, 1, anchor])];
        let w = output[IxDyn(&[0, 2, anchor])];
        let h = output[IxDyn(&[0, 3, anchor])];

        let (x1, y1) = letterbox.to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_original(cx + w / 2.0, cy + h / 2.0);

        candidates.push(RawDetection {
            class_index: best_class,
            confidence: best_score,
            corners: [x1, y1, x2, y2],
        });
    }

    debug!(
        "Decoded {} candidate boxes from {} anchors ({} classes)",
        candidates.len(),
        num_anchors,
        num_classes
    );

    Ok(candidates)
}

/// Per-class non-maximum suppression
///
/// Keeps at most `max_detections` boxes, highest confidence first.
pub fn nms(
    mut detections: Vec<RawDetection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<RawDetection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<RawDetection> = Vec::new();

    for candidate in detections {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_index == candidate.class_index && iou(k, &candidate) >= iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}

/// Intersection over union of two corner boxes
pub fn iou(a: &RawDetection, b: &RawDetection) -> f32 {
    let [ax1, ay1, ax2, ay2] = a.corners;
    let [bx1, by1, bx2, by2] = b.corners;

    let x1 = ax1.max(bx1);
    let y1 = ay1.max(by1);
    let x2 = ax2.min(bx2);
    let y2 = ay2.min(by2);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area_a = (ax2 - ax1).max(0.0) * (ay2 - ay1).max(0.0);
    let area_b = (bx2 - bx1).max(0.0) * (by2 - by1).max(0.0);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Turn detector-native output into response detections
///
/// An unknown class index fails the whole call: it means the label table
/// does not match the model. A box with negative extent is dropped on its
/// own and the rest of the result is kept.
pub fn resolve_detections(
    raw: Vec<RawDetection>,
    labels: &LabelTable,
) -> Result<Vec<Detection>, DetectionError> {
    let mut detections = Vec::with_capacity(raw.len());

    for det in raw {
        let label = labels.get(det.class_index)?;
        match Detection::from_corners(label, det.confidence, det.corners) {
            Ok(detection) => detections.push(detection),
            Err(e) => {
                warn!("Dropping '{}' detection: {}", label, e);
            }
        }
    }

    Ok(detections)
}
