// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Mini Detection Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-scene-analysis-2025-10-17";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-17";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "yolov8-onnx",
    "scene-analysis",
    "synthetic-fallback",
    "degraded-mode",
    "detect-timeout",
    "permissive-cors",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Mini Detection Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
