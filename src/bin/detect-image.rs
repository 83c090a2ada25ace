// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Parser;
use mini_detection_node::{
    analysis::SceneClassifier,
    api::detect::{run_detection, UploadedImage},
    config::{DetectorConfig, DEFAULT_DETECT_TIMEOUT_SECS},
    detection::DetectorManager,
};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Run detection and scene analysis on a local image
#[derive(Parser, Debug)]
#[command(name = "detect-image")]
#[command(version)]
#[command(about = "Print the /detect response for a local image", long_about = None)]
struct Cli {
    /// Image file to analyse
    file: PathBuf,

    #[command(flatten)]
    detector: DetectorConfig,

    /// Upper bound on the detector call, in seconds
    #[arg(long, env = "DETECT_TIMEOUT_SECS", default_value_t = DEFAULT_DETECT_TIMEOUT_SECS)]
    detect_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.detector.validate()?;

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let filename = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let manager = DetectorManager::new(&cli.detector).await;
    let detector = match manager.detector() {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let upload = UploadedImage {
        filename,
        bytes: Bytes::from(bytes),
    };

    match run_detection(
        detector,
        &SceneClassifier::default(),
        upload,
        Duration::from_secs(cli.detect_timeout_secs),
        Uuid::new_v4(),
    )
    .await
    {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
