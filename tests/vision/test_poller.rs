// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read job polling: end to end against the fake provider, and against a
//! scripted status source for cancellation and failure accounting.

use crate::common::{
    failed_result, fast_poller_config, running_result, succeeded_result, FakeProvider, Reply,
    OPERATION_ID, TEST_KEY,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;
use vision_relay::vision::{
    PollerConfig, ReadJob, ReadOperationResult, ReadOperations, ReadPoller, ReadStatus,
    VisionClient, VisionError,
};

/// Status source that replays a script, repeating the last entry
struct ScriptedReads {
    script: Mutex<VecDeque<Result<ReadStatus, u16>>>,
    queries: AtomicU32,
}

impl ScriptedReads {
    fn new(script: Vec<Result<ReadStatus, u16>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            queries: AtomicU32::new(0),
        }
    }

    fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadOperations for ScriptedReads {
    async fn get_read_result(
        &self,
        _operation_id: &str,
    ) -> Result<ReadOperationResult, VisionError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };
        match next {
            Some(Ok(status)) => Ok(ReadOperationResult::with_status(status)),
            Some(Err(status)) => Err(VisionError::Provider {
                status,
                code: "Scripted".to_string(),
                message: format!("scripted {}", status),
            }),
            None => Ok(ReadOperationResult::with_status(ReadStatus::Running)),
        }
    }
}

fn job() -> ReadJob {
    ReadJob::from_location(Some(&format!("/read/analyzeResults/{}", OPERATION_ID))).unwrap()
}

// ============================================================================
// End to end with the provider client
// ============================================================================

#[tokio::test]
async fn test_read_text_end_to_end() {
    const JOB_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    let provider = FakeProvider::start().await;
    provider.set_submit_location(Some(format!(
        "{}vision/v3.2/read/analyzeResults/{}",
        provider.endpoint(),
        JOB_ID
    )));
    provider.push_result(Reply::ok(running_result()));
    provider.push_result(Reply::ok(running_result()));
    provider.push_result(Reply::ok(succeeded_result(&["Hello ", "World"])));
    let client = Arc::new(VisionClient::new(&provider.endpoint(), TEST_KEY).unwrap());
    let poller = ReadPoller::new(fast_poller_config());

    let job = assert_ok!(client.submit_read(b"image".to_vec(), "fr").await);
    assert_eq!(job.operation_id(), JOB_ID);

    let text = assert_ok!(
        poller
            .read_text(client.as_ref(), &job, &CancellationToken::new())
            .await
    );
    assert_eq!(text, "Hello World");

    let queries = provider.requests_to("/vision/v3.2/read/analyzeResults/");
    assert_eq!(queries.len(), 3);
    assert!(queries.iter().all(|q| q.path.ends_with(JOB_ID)));
}

#[tokio::test]
async fn test_failed_job_reports_provider_diagnostic() {
    let provider = FakeProvider::start().await;
    provider.push_result(Reply::ok(running_result()));
    provider.push_result(Reply::ok(failed_result(
        "InvalidImage",
        "The image could not be decoded.",
    )));
    let client = VisionClient::new(&provider.endpoint(), TEST_KEY).unwrap();
    let poller = ReadPoller::new(fast_poller_config());

    let err = assert_err!(poller.poll(&client, &job(), &CancellationToken::new()).await);
    match err {
        VisionError::JobFailed {
            operation_id,
            diagnostic,
        } => {
            assert_eq!(operation_id, OPERATION_ID);
            assert!(diagnostic.contains("InvalidImage"));
            assert!(diagnostic.contains("could not be decoded"));
        }
        other => panic!("Expected JobFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transient_provider_errors_are_retried() {
    let provider = FakeProvider::start().await;
    provider.push_result(Reply::status(503));
    provider.push_result(Reply::error(429, "TooManyRequests", "Slow down"));
    provider.push_result(Reply::ok(succeeded_result(&["retried"])));
    let client = VisionClient::new(&provider.endpoint(), TEST_KEY).unwrap();
    let poller = ReadPoller::new(fast_poller_config());

    let text = assert_ok!(
        poller
            .read_text(&client, &job(), &CancellationToken::new())
            .await
    );
    assert_eq!(text, "retried");
}

#[tokio::test]
async fn test_spawned_read_against_provider() {
    let provider = FakeProvider::start().await;
    provider.push_result(Reply::ok(succeeded_result(&["Bonjour", " le monde"])));
    let client = Arc::new(VisionClient::new(&provider.endpoint(), TEST_KEY).unwrap());
    let poller = ReadPoller::new(fast_poller_config());

    let task = poller.spawn_read_text(client, job(), CancellationToken::new());
    assert_eq!(task.operation_id(), OPERATION_ID);
    let text = assert_ok!(task.wait().await);
    assert_eq!(text, "Bonjour le monde");
}

// ============================================================================
// Scripted status source
// ============================================================================

#[tokio::test]
async fn test_transient_budget_resets_after_success() {
    let reads = ScriptedReads::new(vec![
        Err(503),
        Err(503),
        Err(503),
        Ok(ReadStatus::Running),
        Err(500),
        Err(500),
        Err(500),
        Ok(ReadStatus::Succeeded),
    ]);
    let poller = ReadPoller::new(fast_poller_config());

    let result = assert_ok!(poller.poll(&reads, &job(), &CancellationToken::new()).await);
    assert_eq!(result.status, ReadStatus::Succeeded);
    assert_eq!(reads.queries(), 8);
}

#[tokio::test]
async fn test_gives_up_after_too_many_transient_failures() {
    let reads = ScriptedReads::new(vec![Ok(ReadStatus::NotStarted), Err(502)]);
    let poller = ReadPoller::new(PollerConfig {
        max_transient_failures: 2,
        ..fast_poller_config()
    });

    let err = assert_err!(poller.poll(&reads, &job(), &CancellationToken::new()).await);
    assert!(
        matches!(err, VisionError::Polling { attempts: 3, .. }),
        "{:?}",
        err
    );
    assert_eq!(reads.queries(), 4);
}

#[tokio::test]
async fn test_cancel_running_task() {
    let reads = Arc::new(ScriptedReads::new(vec![Ok(ReadStatus::Running)]));
    let poller = ReadPoller::new(PollerConfig {
        timeout: None,
        ..fast_poller_config()
    });

    let task = poller.spawn_read_text(reads.clone(), job(), CancellationToken::new());
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!task.is_finished());
    task.cancel();

    let err = assert_err!(task.wait().await);
    assert!(matches!(err, VisionError::Cancelled { .. }), "{:?}", err);

    let seen = reads.queries();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(reads.queries(), seen, "polling continued after cancellation");
}

#[tokio::test]
async fn test_parent_token_cancels_child_tasks() {
    let reads = Arc::new(ScriptedReads::new(vec![Ok(ReadStatus::Running)]));
    let poller = ReadPoller::new(PollerConfig {
        timeout: None,
        ..fast_poller_config()
    });
    let shutdown = CancellationToken::new();

    let first = poller.spawn_read_text(reads.clone(), job(), shutdown.child_token());
    let second = poller.spawn_read_text(reads.clone(), job(), shutdown.child_token());
    shutdown.cancel();

    assert!(matches!(first.wait().await, Err(VisionError::Cancelled { .. })));
    assert!(matches!(second.wait().await, Err(VisionError::Cancelled { .. })));
}

#[tokio::test]
async fn test_dropped_guard_cancels_task() {
    let reads = Arc::new(ScriptedReads::new(vec![Ok(ReadStatus::Running)]));
    let poller = ReadPoller::new(PollerConfig {
        timeout: None,
        ..fast_poller_config()
    });

    let task = poller.spawn_read_text(reads.clone(), job(), CancellationToken::new());
    let token = task.cancellation_token();
    {
        let _guard = token.clone().drop_guard();
    }
    assert!(token.is_cancelled());
    assert!(matches!(task.wait().await, Err(VisionError::Cancelled { .. })));
}

#[tokio::test]
async fn test_timeout_bounds_polling() {
    let reads = ScriptedReads::new(vec![Ok(ReadStatus::Running)]);
    let poller = ReadPoller::new(PollerConfig {
        timeout: Some(Duration::from_millis(40)),
        ..fast_poller_config()
    });

    let err = assert_err!(poller.poll(&reads, &job(), &CancellationToken::new()).await);
    match err {
        VisionError::TimedOut { operation_id, elapsed } => {
            assert_eq!(operation_id, OPERATION_ID);
            assert!(elapsed >= Duration::from_millis(40));
        }
        other => panic!("Expected TimedOut, got {:?}", other),
    }
    assert!(reads.queries() >= 1);
}
