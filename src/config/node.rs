// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use super::detector::DetectorConfig;
use crate::api::ApiConfig;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_DETECT_TIMEOUT_SECS: u64 = 30;

/// Mini Detection Node
#[derive(Parser, Debug, Clone)]
#[command(name = "mini-detection-node")]
#[command(version)]
#[command(about = "Object detection and scene analysis over HTTP", long_about = None)]
pub struct NodeConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[command(flatten)]
    pub detector: DetectorConfig,

    /// Upper bound on one detector call, in seconds
    #[arg(long, env = "DETECT_TIMEOUT_SECS", default_value_t = DEFAULT_DETECT_TIMEOUT_SECS)]
    pub detect_timeout_secs: u64,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        if self.detect_timeout_secs == 0 {
            return Err(anyhow!("detect_timeout_secs must be at least 1"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("max_upload_bytes must be at least 1"));
        }
        if self.max_upload_bytes > MAX_IMAGE_SIZE {
            return Err(anyhow!(
                "max_upload_bytes ({}) exceeds the decoder limit ({})",
                self.max_upload_bytes,
                MAX_IMAGE_SIZE
            ));
        }
        Ok(())
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            listen_addr: self.listen_addr,
            detect_timeout: Duration::from_secs(self.detect_timeout_secs),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
