// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod api;
pub mod config;
pub mod detection;
pub mod version;
pub mod vision;

pub use analysis::{SceneAnalysis, SceneClassifier, SceneType};
pub use api::{ApiConfig, ApiServer};
pub use config::{DetectorConfig, FallbackMode, NodeConfig};
pub use detection::{Detection, DetectionError, DetectorManager, ObjectDetector};
