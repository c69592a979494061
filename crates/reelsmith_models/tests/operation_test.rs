//! Tests for interpreting long-running operation payloads.

use reelsmith_core::{GeneratedVideo, OperationStatus};
use reelsmith_models::{PredictOperation, extension_output_prefix};

fn parse(json: &str) -> PredictOperation {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_pending_operation() {
    assert_eq!(parse(r#"{"name":"ops/1"}"#).status(), OperationStatus::Pending);
}

#[test]
fn test_default_mime_type() {
    let op = parse(r#"{"name":"ops/1","done":true,"response":{"videos":[{"gcsUri":"gs://b/v.mp4"}]}}"#);
    assert_eq!(
        op.status(),
        OperationStatus::Succeeded(GeneratedVideo::new("gs://b/v.mp4", "video/mp4"))
    );
}

#[test]
fn test_filtered_videos_fail_with_reasons() {
    let op = parse(
        r#"{"name":"ops/1","done":true,"response":{"raiMediaFilteredCount":1,"raiMediaFilteredReasons":["people"]}}"#,
    );
    match op.status() {
        OperationStatus::Failed { code, message } => {
            assert_eq!(code, None);
            assert!(message.contains("people"));
        }
        other => panic!("unexpected status: {other:?}"),
    }
}

#[test]
fn test_inline_video_is_rejected() {
    let op = parse(
        r#"{"name":"ops/1","done":true,"response":{"videos":[{"bytesBase64Encoded":"AAAA"}]}}"#,
    );
    assert!(matches!(op.status(), OperationStatus::Failed { .. }));
}

#[test]
fn test_done_without_response_fails() {
    assert!(matches!(
        parse(r#"{"name":"ops/1","done":true}"#).status(),
        OperationStatus::Failed { .. }
    ));
}

#[test]
fn test_extension_prefix_for_bucket_root_object() {
    assert_eq!(extension_output_prefix("gs://b/v.mp4"), "gs://b/extensions/");
}
