// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration from flags, environment and `.env`

pub mod detector;
pub mod node;

pub use detector::{DetectorConfig, FallbackMode, DEFAULT_MODEL_PATH};
pub use node::{NodeConfig, DEFAULT_DETECT_TIMEOUT_SECS, DEFAULT_LISTEN_ADDR};
