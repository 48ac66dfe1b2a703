// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Asynchronous read-result poller
//!
//! Drives a submitted read job to a terminal state:
//!
//! ```text
//! Submitted -> Polling -> Succeeded | Failed | TimedOut | Cancelled
//! ```
//!
//! Every tick waits the polling interval and then issues exactly one status
//! query; queries for a job never overlap. Transient query failures are
//! retried with a doubling delay until `max_transient_failures` consecutive
//! failures have been seen. The overall timeout and the cancellation token
//! are both honoured while waiting and while a query is in flight.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let poller = ReadPoller::new(PollerConfig::default());
//! let job = client.submit_read(bytes, "fr").await?;
//! let text = poller.read_text(&client, &job, &cancel_token).await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::ReadOperations;
use super::errors::VisionError;
use super::models::{ReadOperationResult, ReadStatus};
use super::operation::ReadJob;

/// Reference polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound for the backoff delay after transient failures
pub const DEFAULT_MAX_POLL_INTERVAL: Duration = Duration::from_secs(8);

/// Overall bound on one read job
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(120);

/// Consecutive transient query failures tolerated before giving up
pub const DEFAULT_MAX_TRANSIENT_FAILURES: u32 = 3;

/// Poller settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Delay before each status query
    pub interval: Duration,
    /// Cap for the doubled delay after transient failures
    pub max_interval: Duration,
    /// Overall bound; `None` polls until a terminal status or cancellation
    pub timeout: Option<Duration>,
    pub max_transient_failures: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_interval: DEFAULT_MAX_POLL_INTERVAL,
            timeout: Some(DEFAULT_READ_TIMEOUT),
            max_transient_failures: DEFAULT_MAX_TRANSIENT_FAILURES,
        }
    }
}

/// Polls read jobs until they reach a terminal state
#[derive(Debug, Clone, Default)]
pub struct ReadPoller {
    config: PollerConfig,
}

impl ReadPoller {
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Poll `job` until Succeeded, returning the final provider result
    ///
    /// A Failed job is reported as `JobFailed` with the provider's diagnostic.
    pub async fn poll<C>(
        &self,
        client: &C,
        job: &ReadJob,
        cancel_token: &CancellationToken,
    ) -> Result<ReadOperationResult, VisionError>
    where
        C: ReadOperations + ?Sized,
    {
        info!(operation_id = %job.operation_id(), "Polling for read results");
        let start = Instant::now();

        let polling = self.poll_until_terminal(client, job, cancel_token);
        let result = match self.config.timeout {
            Some(limit) => match timeout(limit, polling).await {
                Ok(inner) => inner,
                Err(_) => {
                    warn!(
                        operation_id = %job.operation_id(),
                        timeout_sec = limit.as_secs(),
                        "Read job did not finish before timeout"
                    );
                    Err(VisionError::TimedOut {
                        operation_id: job.operation_id().to_string(),
                        elapsed: start.elapsed(),
                    })
                }
            },
            None => polling.await,
        }?;

        let duration_ms = start.elapsed().as_millis() as u64;
        if result.status == ReadStatus::Failed {
            let diagnostic = result
                .error
                .as_ref()
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_else(|| "provider reported status failed".to_string());
            warn!(
                operation_id = %job.operation_id(),
                duration_ms,
                "Read job failed: {}",
                diagnostic
            );
            return Err(VisionError::JobFailed {
                operation_id: job.operation_id().to_string(),
                diagnostic,
            });
        }

        info!(
            operation_id = %job.operation_id(),
            duration_ms,
            pages = result.pages().len(),
            "Read job succeeded"
        );
        Ok(result)
    }

    /// Poll `job` and flatten the recognised lines into one string
    pub async fn read_text<C>(
        &self,
        client: &C,
        job: &ReadJob,
        cancel_token: &CancellationToken,
    ) -> Result<String, VisionError>
    where
        C: ReadOperations + ?Sized,
    {
        let result = self.poll(client, job, cancel_token).await?;
        if result.analyze_result.is_none() {
            warn!(
                operation_id = %job.operation_id(),
                "Read job succeeded without an analyze result"
            );
        }
        Ok(collect_text(&result))
    }

    /// Run `read_text` on a background task
    ///
    /// The returned handle exposes the completion signal and the token that
    /// stops the task. `cancel_token` is usually a child of a wider token
    /// (server shutdown) so either side can stop polling.
    pub fn spawn_read_text<C>(
        &self,
        client: Arc<C>,
        job: ReadJob,
        cancel_token: CancellationToken,
    ) -> ReadTask
    where
        C: ReadOperations + ?Sized + 'static,
    {
        let poller = self.clone();
        let operation_id = job.operation_id().to_string();
        let task_token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            poller
                .read_text(client.as_ref(), &job, &task_token)
                .await
        });

        ReadTask {
            operation_id,
            cancel_token,
            handle,
        }
    }

    async fn poll_until_terminal<C>(
        &self,
        client: &C,
        job: &ReadJob,
        cancel_token: &CancellationToken,
    ) -> Result<ReadOperationResult, VisionError>
    where
        C: ReadOperations + ?Sized,
    {
        let mut queries: u32 = 0;
        let mut consecutive_failures: u32 = 0;

        loop {
            let delay = self.next_delay(consecutive_failures);
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => return Err(cancelled(job, queries)),
                _ = sleep(delay) => {}
            }

            queries += 1;
            let outcome = tokio::select! {
                biased;
                _ = cancel_token.cancelled() => return Err(cancelled(job, queries)),
                outcome = client.get_read_result(job.operation_id()) => outcome,
            };

            match outcome {
                Ok(result) => {
                    consecutive_failures = 0;
                    debug!(
                        operation_id = %job.operation_id(),
                        query = queries,
                        status = %result.status,
                        "Read job status"
                    );
                    if result.status.is_terminal() {
                        return Ok(result);
                    }
                }
                Err(e) if e.is_transient() => {
                    consecutive_failures += 1;
                    if consecutive_failures > self.config.max_transient_failures {
                        return Err(VisionError::Polling {
                            attempts: consecutive_failures,
                            last_error: e.to_string(),
                        });
                    }
                    warn!(
                        operation_id = %job.operation_id(),
                        query = queries,
                        consecutive_failures,
                        "Transient read status failure, retrying: {}",
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Base interval, doubled per consecutive transient failure up to the cap
    fn next_delay(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.config.interval;
        }
        let factor = 2u32.saturating_pow(consecutive_failures.min(16));
        let cap = self.config.max_interval.max(self.config.interval);
        self.config.interval.saturating_mul(factor).min(cap)
    }
}

fn cancelled(job: &ReadJob, queries: u32) -> VisionError {
    info!(
        operation_id = %job.operation_id(),
        queries,
        "Read job polling cancelled"
    );
    VisionError::Cancelled {
        operation_id: job.operation_id().to_string(),
    }
}

/// Concatenate line text across pages, in provider order
///
/// No separator is inserted between lines, so adjacent lines run together
/// unless the provider's text carries its own spacing.
pub fn collect_text(result: &ReadOperationResult) -> String {
    let mut text = String::new();
    for page in result.pages() {
        debug!(page = page.page, lines = page.lines.len(), "Read results for page");
        for line in &page.lines {
            text.push_str(&line.text);
        }
    }
    text
}

/// Handle to a read job polled on a background task
#[derive(Debug)]
pub struct ReadTask {
    operation_id: String,
    cancel_token: CancellationToken,
    handle: JoinHandle<Result<String, VisionError>>,
}

impl ReadTask {
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Stop polling; `wait` then resolves to `Cancelled`
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to finish and return the accumulated text
    pub async fn wait(self) -> Result<String, VisionError> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(VisionError::Cancelled {
                operation_id: self.operation_id,
            }),
            Err(join_err) => Err(VisionError::Polling {
                attempts: 0,
                last_error: format!("read task panicked: {}", join_err),
            }),
        }
    }
}
