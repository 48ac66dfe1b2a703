// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision response bodies

/// Body returned when a people category was found
pub const PEOPLE_FOUND: &str = "People categories found";

/// Body returned when no people category was found
pub const PEOPLE_NOT_FOUND: &str = "No people categories found";

/// Prefix of the read-text body
pub const READ_TEXT_PREFIX: &str = "Response: ";

/// Body for the model-image check
pub fn people_message(found: bool) -> &'static str {
    if found {
        PEOPLE_FOUND
    } else {
        PEOPLE_NOT_FOUND
    }
}

/// Body for the read-text endpoint
pub fn read_text_body(text: &str) -> String {
    format!("{}{}", READ_TEXT_PREFIX, text)
}
