// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection data model shared by every detector backend

use serde::{Deserialize, Serialize};

use super::error::DetectionError;

/// One recognised object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Human-readable class name (e.g. "person")
    pub label: String,
    /// Detector certainty (0.0-1.0)
    pub confidence: f32,
    /// `[x, y, width, height]` in original image pixels, top-left origin
    #[serde(rename = "box")]
    pub bbox: [f32; 4],
}

impl Detection {
    /// Build a detection from two corner points
    ///
    /// Fails with `InvalidGeometry` when `x2 < x1` or `y2 < y1`.
    pub fn from_corners(
        label: impl Into<String>,
        confidence: f32,
        corners: [f32; 4],
    ) -> Result<Self, DetectionError> {
        Ok(Self {
            label: label.into(),
            confidence,
            bbox: corners_to_box(corners)?,
        })
    }

    pub fn x(&self) -> f32 {
        self.bbox[0]
    }

    pub fn y(&self) -> f32 {
        self.bbox[1]
    }

    pub fn width(&self) -> f32 {
        self.bbox[2]
    }

    pub fn height(&self) -> f32 {
        self.bbox[3]
    }
}

/// Detector-native output before label lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Index into the model's label table
    pub class_index: usize,
    /// Detector certainty (0.0-1.0)
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in original image pixels
    pub corners: [f32; 4],
}

/// Convert `[x1, y1, x2, y2]` into `[x, y, width, height]`
pub fn corners_to_box(corners: [f32; 4]) -> Result<[f32; 4], DetectionError> {
    let [x1, y1, x2, y2] = corners;
    let width = x2 - x1;
    let height = y2 - y1;

    // NaN fails both comparisons, so test for the valid case
    if !(width >= 0.0 && height >= 0.0) {
        return Err(DetectionError::InvalidGeometry { width, height });
    }

    Ok([x1, y1, width, height])
}
