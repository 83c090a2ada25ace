// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::detection::DetectionError;
use crate::vision::ImageError;

pub const MODEL_NOT_LOADED_ERROR: &str = "AI model not loaded";
pub const MODEL_NOT_LOADED_MESSAGE: &str = "Backend is running in mock mode fallback";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError {
        field: String,
        message: String,
    },
    DecodeError(String),
    PayloadTooLarge {
        limit: usize,
    },
    /// No detector installed; answered with 200 and the degraded body
    ModelNotLoaded,
    InternalError(String),
    Timeout,
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::DecodeError(msg) => ("decode_error", msg.clone(), None),
            ApiError::PayloadTooLarge { limit } => {
                let mut details = HashMap::new();
                details.insert(
                    "limit_bytes".to_string(),
                    serde_json::Value::Number((*limit).into()),
                );
                (
                    "payload_too_large",
                    format!("Upload exceeds the {} byte limit", limit),
                    Some(details),
                )
            }
            ApiError::ModelNotLoaded => {
                return ErrorResponse {
                    error: MODEL_NOT_LOADED_ERROR.to_string(),
                    message: MODEL_NOT_LOADED_MESSAGE.to_string(),
                    details: None,
                };
            }
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
            ApiError::Timeout => ("timeout", "Detection timed out".to_string(), None),
        };

        ErrorResponse {
            error: error.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::ValidationError { .. }
            | ApiError::DecodeError(_) => 400,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::ModelNotLoaded => 200,
            ApiError::InternalError(_) => 500,
            ApiError::Timeout => 504,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            ApiError::PayloadTooLarge { limit } => {
                write!(f, "Payload too large (max: {} bytes)", limit)
            }
            ApiError::ModelNotLoaded => write!(f, "{}", MODEL_NOT_LOADED_ERROR),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Timeout => write!(f, "Detection timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DetectionError> for ApiError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::Decode(ImageError::TooLarge(_, limit)) => {
                ApiError::PayloadTooLarge { limit }
            }
            DetectionError::ModelUnavailable(_) => ApiError::ModelNotLoaded,
            e if e.is_client_error() => ApiError::DecodeError(e.to_string()),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
