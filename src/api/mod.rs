// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;
pub mod errors;
pub mod http_server;
pub mod root;
pub mod server;

pub use detect::{detect_handler, DetectionResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, AppState};
pub use root::{root_handler, RootResponse};
pub use server::{ApiConfig, ApiServer};
