// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use mini_detection_node::{
    api::ApiServer, config::NodeConfig, detection::DetectorManager, version,
};
use std::env;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("🚀 Starting {}", version::get_version_string());
    info!("Build: {} features: {}", version::VERSION, version::FEATURES.join(", "));

    let config = NodeConfig::parse();
    config.validate()?;

    let manager = DetectorManager::new(&config.detector).await;
    match manager.info() {
        Some(detector) if detector.model_backed => {
            info!("✅ Detector: {} (model loaded)", detector.name)
        }
        Some(detector) => warn!("⚠️ Detector: {} (synthetic fallback)", detector.name),
        None => warn!(
            "⚠️ No detector available: {}",
            manager.load_error().unwrap_or("unknown error")
        ),
    }

    let server = ApiServer::start(config.api_config(), manager).await?;
    info!("✅ Listening on http://{}", server.local_addr());

    signal::ctrl_c().await?;
    info!("Shutting down...");
    server.shutdown().await;

    Ok(())
}
