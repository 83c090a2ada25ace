// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::http_server::{create_app, AppState};
use crate::config::DEFAULT_DETECT_TIMEOUT_SECS;
use crate::detection::DetectorManager;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    pub detect_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            detect_timeout: Duration::from_secs(DEFAULT_DETECT_TIMEOUT_SECS),
            max_upload_bytes: MAX_IMAGE_SIZE,
        }
    }
}

/// Running HTTP server
///
/// The listener is bound in `start`; serving happens on a background task
/// until `shutdown` is called.
pub struct ApiServer {
    addr: SocketAddr,
    model_loaded: bool,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ApiServer {
    pub async fn start(config: ApiConfig, detector_manager: DetectorManager) -> Result<Self> {
        let model_loaded = detector_manager.model_loaded();
        let state = AppState::new(
            detector_manager,
            config.detect_timeout,
            config.max_upload_bytes,
        );

        let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = create_app(state);

        let handle = tokio::spawn(async move {
            let serve_future = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = serve_future.await {
                error!("HTTP server error: {}", e);
            }
        });

        info!("API server listening on {} (model_loaded: {})", addr, model_loaded);

        Ok(Self {
            addr,
            model_loaded,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn model_loaded(&self) -> bool {
        self.model_loaded
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("API server on {} stopped", self.addr);
    }
}
