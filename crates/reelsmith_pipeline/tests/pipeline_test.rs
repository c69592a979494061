//! End-to-end runs of the pipeline against mock models and a temp store.

mod test_utils;

use reelsmith_config::{ExtensionConfig, GenerationMode, PipelineConfig};
use reelsmith_core::PipelineResult;
use reelsmith_interface::BlobStore;
use reelsmith_pipeline::{AdRequest, Pipeline, TEMP_FILE_PREFIXES};
use serde_json::json;
use std::sync::Arc;
use test_utils::{
    Harness, MockPoll, MockResponse, MockVideoDriver, MockVisionDriver, RecordingConcatenator,
    RecordingSleeper, files_with_prefixes, product_image,
};

const TWO_SEGMENTS: &str = r#"```json
[
  {"segment_number": 1, "duration": 8, "veo_prompt": "Slow dolly toward the bottle on marble"},
  {"segment_number": 2, "duration": 8, "veo_prompt": "Orbit around the bottle as mist rises"}
]
```"#;

struct Fixture {
    harness: Harness,
    vision: Arc<MockVisionDriver>,
    video: Arc<MockVideoDriver>,
    concatenator: Arc<RecordingConcatenator>,
}

impl Fixture {
    fn new(vision: MockVisionDriver, video: MockVideoDriver) -> Self {
        Self {
            harness: Harness::new(),
            vision: Arc::new(vision),
            video: Arc::new(video),
            concatenator: Arc::new(RecordingConcatenator::new()),
        }
    }

    fn pipeline(&self, config: PipelineConfig) -> Pipeline {
        Pipeline::new(
            config,
            self.vision.clone(),
            self.video.clone(),
            self.harness.store.clone(),
            self.concatenator.clone(),
            Arc::new(RecordingSleeper::new()),
        )
        .unwrap()
    }
}

fn request(image_count: usize) -> AdRequest {
    AdRequest::builder()
        .images(
            (0..image_count)
                .map(|i| product_image(&format!("shot_{i}.png")))
                .collect::<Vec<_>>(),
        )
        .product_overview("Amber glass perfume bottle with a brass cap")
        .total_duration(16u32)
        .segment_duration(8u32)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_three_images_two_segments_end_to_end() {
    let fixture = Fixture::new(
        MockVisionDriver::new_success(TWO_SEGMENTS),
        MockVideoDriver::new_success(),
    );
    let pipeline = fixture.pipeline(fixture.harness.config.clone());

    let result = pipeline.run(&request(3)).await;

    let PipelineResult::Success {
        asset_url,
        request_id,
        segment_count,
        duration,
    } = result
    else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(segment_count, 2);
    assert_eq!(duration, 16);
    assert!(asset_url.ends_with(&format!("{}/final_merged_video.mp4", request_id)));

    assert_eq!(fixture.vision.call_count(), 1);
    assert_eq!(fixture.video.submitted().len(), 2);
    assert_eq!(fixture.concatenator.calls().len(), 1);
    assert_eq!(fixture.concatenator.calls()[0].len(), 2);

    let images = fixture
        .harness
        .store
        .list(&format!("veo-product-videos/{}/input_images/", request_id))
        .await
        .unwrap();
    assert_eq!(images.len(), 3);
    assert!(files_with_prefixes(&fixture.harness.work_dir(), &TEMP_FILE_PREFIXES).is_empty());
}

#[tokio::test]
async fn test_partial_failure_reports_reduced_segment_count() {
    let fixture = Fixture::new(
        MockVisionDriver::new_success(TWO_SEGMENTS),
        MockVideoDriver::new_sequence(vec![MockPoll::Pending; 9]),
    );
    let pipeline = fixture.pipeline(fixture.harness.config.clone());

    let result = pipeline.run(&request(3)).await;

    match result {
        PipelineResult::Success {
            segment_count,
            duration,
            ..
        } => {
            assert_eq!(segment_count, 1);
            assert_eq!(duration, 8);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert!(fixture.concatenator.calls().is_empty());
}

#[tokio::test]
async fn test_every_segment_failing_is_reported() {
    let fixture = Fixture::new(
        MockVisionDriver::new_success(TWO_SEGMENTS),
        MockVideoDriver::new_sequence(vec![MockPoll::Pending; 18]),
    );
    let pipeline = fixture.pipeline(fixture.harness.config.clone());

    let result = pipeline.run(&request(1)).await;

    assert_eq!(
        result,
        PipelineResult::failure("No video segments were generated (2 attempted)")
    );
}

#[tokio::test]
async fn test_invalid_requests_fail_before_any_model_call() {
    let fixture = Fixture::new(
        MockVisionDriver::new_success(TWO_SEGMENTS),
        MockVideoDriver::new_success(),
    );
    let pipeline = fixture.pipeline(fixture.harness.config.clone());

    let blank_overview = AdRequest::builder()
        .images(vec![product_image("a.png")])
        .product_overview("   ")
        .build()
        .unwrap();
    let cases = [
        (request(0), "No images provided"),
        (request(4), "Max 3 images"),
        (blank_overview, "Product overview is required"),
    ];

    for (request, message) in cases {
        assert_eq!(pipeline.run(&request).await, PipelineResult::failure(message));
    }
    assert_eq!(fixture.vision.call_count(), 0);
    assert_eq!(fixture.video.total_calls(), 0);
}

#[tokio::test]
async fn test_prompt_failure_becomes_failure_result() {
    let unavailable = MockResponse::Error(reelsmith_error::GeminiErrorKind::Unavailable(
        "overloaded".to_string(),
    ));
    let fixture = Fixture::new(
        MockVisionDriver::new_sequence(vec![unavailable; 5]),
        MockVideoDriver::new_success(),
    );
    let pipeline = fixture.pipeline(fixture.harness.config.clone());

    let result = pipeline.run(&request(1)).await;

    match result {
        PipelineResult::Failure { error_message } => {
            assert!(error_message.starts_with("Model unavailable after 5 attempts"));
            assert!(!error_message.contains(" at line "));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(fixture.video.total_calls(), 0);
}

#[tokio::test]
async fn test_extension_mode_end_to_end() {
    let fixture = Fixture::new(
        MockVisionDriver::new_success(TWO_SEGMENTS),
        MockVideoDriver::new_success(),
    );
    let mut config = fixture.harness.config.clone();
    config.video.mode = GenerationMode::Extension;
    let pipeline = fixture.pipeline(config);

    let result = pipeline.run(&request(2)).await;

    match result {
        PipelineResult::Success {
            asset_url,
            segment_count,
            duration,
            ..
        } => {
            assert_eq!(segment_count, 1);
            assert_eq!(duration, 29);
            assert!(asset_url.ends_with(".ext3.mp4"));
        }
        other => panic!("expected success, got {other:?}"),
    }
    let submitted = fixture.video.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].prompt(), "Slow dolly toward the bottle on marble");
    assert!(submitted[0].image().as_ref().unwrap().uri().ends_with("shot_0.png"));
    assert!(fixture.concatenator.calls().is_empty());
}

#[test]
fn test_invalid_extension_config_fails_construction() {
    let harness = Harness::new();
    for count in [0, 21] {
        let mut config = harness.config.clone();
        config.video.mode = GenerationMode::Extension;
        config.extension = ExtensionConfig {
            base_duration: 8,
            count,
            increment: 7,
        };
        let video = Arc::new(MockVideoDriver::new_success());

        let result = Pipeline::new(
            config,
            Arc::new(MockVisionDriver::new_success(TWO_SEGMENTS)),
            video.clone(),
            harness.store.clone(),
            Arc::new(RecordingConcatenator::new()),
            Arc::new(RecordingSleeper::new()),
        );

        assert!(result.is_err(), "count {count} accepted");
        assert_eq!(video.total_calls(), 0);
    }
}

#[tokio::test]
async fn test_plan_returns_directives_without_video_calls() {
    let fixture = Fixture::new(
        MockVisionDriver::new_success("A single sweeping shot of the bottle at golden hour"),
        MockVideoDriver::new_success(),
    );
    let pipeline = fixture.pipeline(fixture.harness.config.clone());
    let request = AdRequest::builder()
        .images(vec![product_image("a.png")])
        .product_overview("Amber glass perfume bottle")
        .total_duration(24u32)
        .build()
        .unwrap();

    let directives = pipeline.plan(&request).await.unwrap();

    assert_eq!(directives.len(), 3);
    assert_eq!(fixture.video.total_calls(), 0);
    assert!(fixture.harness.config.prompts.output_file.exists());
}

#[test]
fn test_result_json_shapes() {
    let success = PipelineResult::Success {
        asset_url: "https://storage.example/final.mp4".to_string(),
        request_id: "1700000000_ab12cd34".to_string(),
        segment_count: 2,
        duration: 16,
    };
    assert_eq!(
        serde_json::to_value(&success).unwrap(),
        json!({
            "asset_url": "https://storage.example/final.mp4",
            "request_id": "1700000000_ab12cd34",
            "segment_count": 2,
            "duration": 16
        })
    );
    assert_eq!(
        serde_json::to_value(PipelineResult::failure("Max 3 images")).unwrap(),
        json!({"error": "Max 3 images"})
    );
}
