// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and preprocessing for object detection
//!
//! This module provides:
//! - Format sniffing and decoding of uploaded image bytes
//! - Letterbox preprocessing into NCHW tensors for YOLO-style models

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use preprocessing::{letterbox, Letterbox, DETECTION_INPUT_SIZE};
