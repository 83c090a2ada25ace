// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service status endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;

pub const ROOT_MESSAGE: &str = "Mini Detection System API is running";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    /// True only when the real model initialised at startup
    pub model_loaded: bool,
}

/// GET / - Report liveness and whether the model is loaded
pub async fn root_handler(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
        model_loaded: state.detector_manager.model_loaded(),
    })
}
