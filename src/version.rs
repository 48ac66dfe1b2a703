// Version information for the vision relay

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Provider API version the client speaks
pub const PROVIDER_API_VERSION: &str = "v3.2";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "image-analysis",
    "people-detection",
    "async-read",
    "read-timeout",
    "read-cancellation",
    "transient-retry",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!(
        "Vision Relay {} (provider API {})",
        VERSION_NUMBER, PROVIDER_API_VERSION
    )
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "providerApi": PROVIDER_API_VERSION,
        "features": FEATURES,
    })
}
