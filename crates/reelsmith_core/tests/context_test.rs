use reelsmith_core::{GeneratedSegment, PipelineResult, RequestContext, SegmentStatus};
use std::collections::HashSet;

#[test]
fn test_request_id_has_timestamp_and_hex_suffix() {
    let ctx = RequestContext::generate("veo-product-videos");
    let (timestamp, suffix) = ctx.request_id().split_once('_').unwrap();
    assert!(timestamp.parse::<i64>().unwrap() > 1_600_000_000);
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        ctx.asset_namespace(),
        &format!("veo-product-videos/{}", ctx.request_id())
    );
}

#[test]
fn test_concurrent_contexts_do_not_collide() {
    let ids: HashSet<String> = (0..200)
        .map(|_| RequestContext::generate("runs").request_id().clone())
        .collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn test_folders_are_nested_under_namespace() {
    let ctx = RequestContext::with_id("prefix/", "42_deadbeef");
    assert_eq!(ctx.asset_namespace(), "prefix/42_deadbeef");
    assert_eq!(ctx.input_images_folder(), "prefix/42_deadbeef/input_images");
    assert_eq!(ctx.segments_folder(), "prefix/42_deadbeef/segments");
}

#[test]
fn test_segment_status() {
    let ok = GeneratedSegment::succeeded(1, "gs://b/s1.mp4");
    assert!(ok.is_success());
    assert_eq!(ok.status().to_string(), "success");

    let failed = GeneratedSegment::failed(2);
    assert!(!failed.is_success());
    assert_eq!(*failed.status(), SegmentStatus::Failed);
}

#[test]
fn test_pipeline_result_shapes() {
    let success = PipelineResult::Success {
        asset_url: "https://signed".into(),
        request_id: "1_abcdef12".into(),
        segment_count: 2,
        duration: 16,
    };
    let json = serde_json::to_value(&success).unwrap();
    assert_eq!(json["segment_count"], 2);
    assert_eq!(json["duration"], 16);
    assert!(success.is_success());

    let failure = PipelineResult::failure("boom");
    assert_eq!(serde_json::to_string(&failure).unwrap(), r#"{"error":"boom"}"#);
    assert!(!failure.is_success());
}
