// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision API endpoint module
//!
//! Provides POST /api/vision/{modelImage,analyse,readtext}.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{analyse_handler, model_image_handler, read_text_handler};
pub use request::ImagePathQuery;
