// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detect API endpoint module
//!
//! Provides POST /detect for object detection with scene analysis.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{detect_handler, run_detection};
pub use request::{read_upload, UploadedImage, FILE_FIELD};
pub use response::DetectionResponse;
