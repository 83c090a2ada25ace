// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detect endpoint response types

use serde::{Deserialize, Serialize};

use crate::analysis::SceneAnalysis;
use crate::detection::Detection;

pub const SUCCESS_MESSAGE: &str = "Detection successful";
pub const SYNTHETIC_SUCCESS_MESSAGE: &str = "Detection successful (synthetic fallback)";

fn is_false(value: &bool) -> bool {
    !*value
}

/// Successful detection, possibly with zero detections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// Original upload name
    pub filename: String,
    /// In detector emission order
    pub detections: Vec<Detection>,
    pub message: String,
    pub analysis: SceneAnalysis,
    /// Set when the detections are fabricated
    #[serde(default, skip_serializing_if = "is_false")]
    pub synthetic: bool,
}

impl DetectionResponse {
    pub fn new(
        filename: String,
        detections: Vec<Detection>,
        analysis: SceneAnalysis,
        synthetic: bool,
    ) -> Self {
        let message = if synthetic {
            SYNTHETIC_SUCCESS_MESSAGE
        } else {
            SUCCESS_MESSAGE
        };
        Self {
            filename,
            detections,
            message: message.to_string(),
            analysis,
            synthetic,
        }
    }
}
