// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration loaded from environment variables
//!
//! Binaries call `dotenv::dotenv()` first so a local `.env` file can supply
//! the same variables.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::vision::{ImageDetail, PollerConfig};

pub const ENV_SUBSCRIPTION_KEY: &str = "AZURE_SUBSCRIPTION_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_COGNITIVE_SERVICE_ENDPOINT";
pub const ENV_LISTEN_ADDR: &str = "API_LISTEN_ADDR";
pub const ENV_DEFAULT_IMAGE_PATH: &str = "DEFAULT_IMAGE_PATH";
pub const ENV_READ_LANGUAGE: &str = "READ_LANGUAGE";
pub const ENV_POLL_INTERVAL_MS: &str = "READ_POLL_INTERVAL_MS";
pub const ENV_MAX_INTERVAL_MS: &str = "READ_MAX_INTERVAL_MS";
pub const ENV_READ_TIMEOUT_SECS: &str = "READ_TIMEOUT_SECS";
pub const ENV_MAX_TRANSIENT_FAILURES: &str = "READ_MAX_TRANSIENT_FAILURES";
pub const ENV_ANALYZE_DETAILS: &str = "ANALYZE_DETAILS";
pub const ENV_PROVIDER_TIMEOUT_SECS: &str = "PROVIDER_REQUEST_TIMEOUT_SECS";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_READ_LANGUAGE: &str = "fr";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Provider endpoint and credential
#[derive(Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub subscription_key: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("subscription_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub provider: ProviderConfig,
    pub listen_addr: SocketAddr,
    /// Used when a request omits `imagePath`
    pub default_image_path: Option<String>,
    /// Language hint sent with read submissions
    pub read_language: String,
    pub poller: PollerConfig,
    /// Extra category details requested by full analyses
    pub analyze_details: Vec<ImageDetail>,
}

impl RelayConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let subscription_key =
            get(ENV_SUBSCRIPTION_KEY).ok_or(ConfigError::Missing(ENV_SUBSCRIPTION_KEY))?;
        let endpoint = get(ENV_ENDPOINT).ok_or(ConfigError::Missing(ENV_ENDPOINT))?;
        url::Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
            name: ENV_ENDPOINT,
            reason: e.to_string(),
        })?;

        let provider_timeout: u64 = parse_or(
            get(ENV_PROVIDER_TIMEOUT_SECS),
            ENV_PROVIDER_TIMEOUT_SECS,
            DEFAULT_PROVIDER_TIMEOUT_SECS,
        )?;

        let listen_addr = get(ENV_LISTEN_ADDR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: ENV_LISTEN_ADDR,
                reason: e.to_string(),
            })?;

        let defaults = PollerConfig::default();
        let interval_ms: u64 = parse_or(
            get(ENV_POLL_INTERVAL_MS),
            ENV_POLL_INTERVAL_MS,
            defaults.interval.as_millis() as u64,
        )?;
        if interval_ms == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_POLL_INTERVAL_MS,
                reason: "must be greater than zero".to_string(),
            });
        }
        let max_interval_ms: u64 = parse_or(
            get(ENV_MAX_INTERVAL_MS),
            ENV_MAX_INTERVAL_MS,
            defaults.max_interval.as_millis() as u64,
        )?;
        let default_timeout = defaults.timeout.map(|t| t.as_secs()).unwrap_or(0);
        let timeout_secs: u64 = parse_or(get(ENV_READ_TIMEOUT_SECS), ENV_READ_TIMEOUT_SECS, default_timeout)?;
        let max_transient_failures: u32 = parse_or(
            get(ENV_MAX_TRANSIENT_FAILURES),
            ENV_MAX_TRANSIENT_FAILURES,
            defaults.max_transient_failures,
        )?;

        let analyze_details = match get(ENV_ANALYZE_DETAILS) {
            Some(raw) => raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    s.parse::<ImageDetail>().map_err(|reason| ConfigError::Invalid {
                        name: ENV_ANALYZE_DETAILS,
                        reason,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            provider: ProviderConfig {
                endpoint,
                subscription_key,
                request_timeout: Duration::from_secs(provider_timeout),
            },
            listen_addr,
            default_image_path: get(ENV_DEFAULT_IMAGE_PATH),
            read_language: get(ENV_READ_LANGUAGE)
                .unwrap_or_else(|| DEFAULT_READ_LANGUAGE.to_string()),
            poller: PollerConfig {
                interval: Duration::from_millis(interval_ms),
                max_interval: Duration::from_millis(max_interval_ms),
                // 0 disables the overall bound
                timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
                max_transient_failures,
            },
            analyze_details,
        })
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: format!("'{}': {}", value, e),
        }),
        None => Ok(default),
    }
}
