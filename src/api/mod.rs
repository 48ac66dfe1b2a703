// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod vision;

pub use errors::{ApiError, ApiErrorResponse, ErrorResponse};
pub use handlers::{health_handler, version_handler, HealthResponse};
pub use http_server::{create_router, start_server, AppState};
pub use vision::{analyse_handler, model_image_handler, read_text_handler, ImagePathQuery};
