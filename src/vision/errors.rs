// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the vision provider adapter and the read poller
//!
//! Each variant is a distinct failure kind so that the HTTP layer can map it
//! to its own status code instead of collapsing everything into one response.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the vision provider or polling a read job
#[derive(Debug, Error)]
pub enum VisionError {
    /// Network or connectivity failure before a provider answer was received
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Provider rejected the request ({status}): {code}: {message}")]
    Provider {
        status: u16,
        code: String,
        message: String,
    },

    /// The provider answered 2xx but the body could not be decoded
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// The read job identifier could not be derived from the location token
    #[error("Malformed operation location: {location:?}")]
    MalformedLocation { location: Option<String> },

    /// The provider reported the read job as failed
    #[error("Read job {operation_id} failed: {diagnostic}")]
    JobFailed {
        operation_id: String,
        diagnostic: String,
    },

    /// Too many consecutive transient failures while polling
    #[error("Polling gave up after {attempts} consecutive failures: {last_error}")]
    Polling { attempts: u32, last_error: String },

    /// The local image could not be read
    #[error("Image unavailable at {path}: {source}")]
    IoUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The read job did not reach a terminal state in time
    #[error("Read job {operation_id} timed out after {}s", .elapsed.as_secs())]
    TimedOut {
        operation_id: String,
        elapsed: Duration,
    },

    /// Polling was cancelled (caller went away or the server is shutting down)
    #[error("Read job {operation_id} was cancelled")]
    Cancelled { operation_id: String },
}

impl VisionError {
    /// Whether a failed status query is worth retrying on the next tick
    ///
    /// Connectivity problems, throttling and provider-side 5xx are transient;
    /// everything else (unknown operation, bad key, malformed body) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            VisionError::Transport(_) => true,
            VisionError::Provider { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short machine-readable kind, used in logs and error responses
    pub fn kind(&self) -> &'static str {
        match self {
            VisionError::Transport(_) => "transport",
            VisionError::Provider { .. } => "provider",
            VisionError::InvalidResponse(_) => "invalid_response",
            VisionError::MalformedLocation { .. } => "malformed_location",
            VisionError::JobFailed { .. } => "job_failed",
            VisionError::Polling { .. } => "polling",
            VisionError::IoUnavailable { .. } => "io_unavailable",
            VisionError::TimedOut { .. } => "timed_out",
            VisionError::Cancelled { .. } => "cancelled",
        }
    }
}
