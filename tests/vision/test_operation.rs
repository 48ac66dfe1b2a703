// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read job identity and read result decoding

use crate::common::{failed_result, running_result, succeeded_result};
use vision_relay::vision::{
    collect_text, extract_operation_id, ReadJob, ReadOperationResult, ReadStatus, VisionError,
};

#[test]
fn test_operation_id_from_provider_location() {
    let location = "https://francecentral.api.cognitive.microsoft.com/vision/v3.2/read/analyzeResults/9d2f6c1a-7e44-4b0e-b6d1-2c8f3a5e7b90";
    let job = ReadJob::from_location(Some(location)).unwrap();
    assert_eq!(job.operation_id(), "9d2f6c1a-7e44-4b0e-b6d1-2c8f3a5e7b90");
    assert_eq!(job.location(), location);
}

#[test]
fn test_operation_id_ignores_surrounding_whitespace() {
    assert_eq!(
        extract_operation_id(Some("  /read/analyzeResults/op-1  ")).unwrap(),
        "op-1"
    );
}

#[test]
fn test_operation_id_ignores_fragment() {
    assert_eq!(
        extract_operation_id(Some("https://host/read/analyzeResults/op-2#top")).unwrap(),
        "op-2"
    );
}

#[test]
fn test_malformed_location_keeps_raw_value() {
    match ReadJob::from_location(Some("   ")) {
        Err(VisionError::MalformedLocation { location }) => {
            assert_eq!(location.as_deref(), Some("   "));
        }
        other => panic!("Expected MalformedLocation, got {:?}", other),
    }
}

#[test]
fn test_decode_running_result() {
    let result: ReadOperationResult = serde_json::from_value(running_result()).unwrap();
    assert_eq!(result.status, ReadStatus::Running);
    assert!(!result.status.is_terminal());
    assert!(result.created_date_time.is_some());
    assert!(result.pages().is_empty());
    assert_eq!(collect_text(&result), "");
}

#[test]
fn test_decode_succeeded_result() {
    let result: ReadOperationResult =
        serde_json::from_value(succeeded_result(&["Hello", " World"])).unwrap();
    assert_eq!(result.status, ReadStatus::Succeeded);
    assert_eq!(result.pages().len(), 1);
    assert_eq!(result.pages()[0].lines.len(), 2);
    assert_eq!(result.pages()[0].lines[0].bounding_box.len(), 8);
    assert_eq!(collect_text(&result), "Hello World");
}

#[test]
fn test_decode_failed_result_keeps_error() {
    let result: ReadOperationResult =
        serde_json::from_value(failed_result("InvalidImage", "The image is corrupt.")).unwrap();
    assert_eq!(result.status, ReadStatus::Failed);
    assert!(result.status.is_terminal());
    let error = result.error.unwrap();
    assert_eq!(error.code, "InvalidImage");
    assert_eq!(error.message, "The image is corrupt.");
}

#[test]
fn test_status_accepts_any_case() {
    for raw in ["notStarted", "NotStarted", "notstarted"] {
        let status: ReadStatus = serde_json::from_value(serde_json::json!(raw)).unwrap();
        assert_eq!(status, ReadStatus::NotStarted);
    }
    let status: ReadStatus = serde_json::from_value(serde_json::json!("SUCCEEDED")).unwrap();
    assert_eq!(status, ReadStatus::Succeeded);
}
