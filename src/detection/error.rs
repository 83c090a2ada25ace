// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the detector adapter

use thiserror::Error;

use crate::vision::ImageError;

#[derive(Debug, Error)]
pub enum DetectionError {
    /// No detector could be initialised at startup
    #[error("Detection model not loaded: {0}")]
    ModelUnavailable(String),

    /// The uploaded bytes are not a supported, decodable image
    #[error("Invalid image: {0}")]
    Decode(#[from] ImageError),

    /// A detection whose derived width or height is negative
    #[error("Invalid detection geometry: width={width}, height={height}")]
    InvalidGeometry { width: f32, height: f32 },

    /// The model emitted a class index the label table does not cover
    #[error("Class index {index} is outside the label table ({table_len} labels)")]
    UnknownClassIndex { index: usize, table_len: usize },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl DetectionError {
    /// True for failures caused by the uploaded content rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, DetectionError::Decode(_))
    }
}
