// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload parsing for the detect endpoint

use axum::http::StatusCode;
use axum_extra::extract::multipart::MultipartError;
use axum_extra::extract::Multipart;
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::api::errors::ApiError;

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// An uploaded image read fully into memory
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied filename, not validated for path safety
    pub filename: String,
    pub bytes: Bytes,
}

/// Read the `file` part of a multipart body
///
/// Other parts are skipped. Parts larger than `max_bytes` are rejected
/// without being buffered past the limit.
pub async fn read_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedImage, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        // A part without a filename is a plain form value, not an upload
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => {
                return Err(ApiError::ValidationError {
                    field: FILE_FIELD.to_string(),
                    message: "file must be an uploaded file".to_string(),
                })
            }
        };

        let mut buf = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            if buf.len() + chunk.len() > max_bytes {
                return Err(ApiError::PayloadTooLarge { limit: max_bytes });
            }
            buf.extend_from_slice(&chunk);
        }

        return Ok(UploadedImage {
            filename,
            bytes: buf.freeze(),
        });
    }

    Err(ApiError::ValidationError {
        field: FILE_FIELD.to_string(),
        message: "file is required".to_string(),
    })
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit: max_bytes }
    } else {
        ApiError::InvalidRequest(format!("Multipart error: {}", err.body_text()))
    }
}
