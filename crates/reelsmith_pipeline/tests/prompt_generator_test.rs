//! Tests for prompt generation: parsing tiers, count reconciliation and retries.

mod test_utils;

use reelsmith_config::PipelineConfig;
use reelsmith_core::{DirectiveContent, SegmentDirective};
use reelsmith_error::{GeminiErrorKind, PromptErrorKind, ReelsmithErrorKind};
use reelsmith_pipeline::{PromptBrief, PromptGenerator, load_directives};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{Harness, MockResponse, MockVisionDriver, RecordingSleeper, product_image};

fn brief(total: u32, segment: u32) -> PromptBrief {
    PromptBrief::builder()
        .image(product_image("bottle.png"))
        .product_overview("Amber glass perfume bottle with a brass cap")
        .brand_guidelines("Warm tones, no text overlays")
        .total_duration(total)
        .segment_duration(segment)
        .build()
        .unwrap()
}

fn prompt_generator(
    config: &PipelineConfig,
    driver: MockVisionDriver,
) -> (PromptGenerator, Arc<MockVisionDriver>, Arc<RecordingSleeper>) {
    let driver = Arc::new(driver);
    let sleeper = Arc::new(RecordingSleeper::new());
    let generator = PromptGenerator::new(driver.clone(), sleeper.clone(), config).unwrap();
    (generator, driver, sleeper)
}

#[tokio::test]
async fn test_directive_count_matches_duration_ratio() {
    let harness = Harness::new();
    for (total, segment) in [(8, 8), (16, 8), (24, 8), (12, 4), (20, 4), (18, 6), (35, 7)] {
        let (generator, _, _) = prompt_generator(
            &harness.config,
            MockVisionDriver::new_success(r#"[{"veo_prompt": "Macro shot of the cap"}]"#),
        );
        let directives = generator.generate(&brief(total, segment)).await.unwrap();

        assert_eq!(directives.len() as u32, total / segment, "{total}/{segment}");
        for (i, directive) in directives.iter().enumerate() {
            assert_eq!(directive.segment_number(), i as u32 + 1);
        }
    }
}

#[tokio::test]
async fn test_array_content_is_preserved() {
    let harness = Harness::new();
    let elements = json!([
        {
            "segment_number": 7,
            "duration": 8,
            "scene_summary": "Opening reveal",
            "veo_prompt": "Slow dolly toward the bottle on black marble",
            "camera": {"move": "dolly", "lens": "85mm"},
            "lighting": "rim light"
        },
        {
            "segment_number": 9,
            "duration": 8,
            "scene_summary": "Closing hero shot",
            "veo_prompt": "Orbit around the bottle as mist rises",
            "mood": ["calm", "luxurious"]
        }
    ]);
    let reply = format!("Sure! Here are the segments:\n```json\n{:#}\n```\nEnjoy.", elements);
    let (generator, driver, _) = prompt_generator(&harness.config, MockVisionDriver::new_success(reply));

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    assert_eq!(driver.call_count(), 1);
    assert_eq!(directives.len(), 2);
    for (i, (directive, element)) in directives.iter().zip(elements.as_array().unwrap()).enumerate() {
        let mut expected = element.as_object().unwrap().clone();
        expected.remove("segment_number");
        expected.remove("duration");

        assert_eq!(directive.segment_number(), i as u32 + 1);
        assert_eq!(directive.duration(), 8);
        assert_eq!(directive.content(), &DirectiveContent::Structured(expected));
    }
}

#[tokio::test]
async fn test_raw_text_is_replicated() {
    let harness = Harness::new();
    let text = "A cinematic, slow rotating shot of the perfume bottle on wet sand at dusk";
    let (generator, _, _) = prompt_generator(&harness.config, MockVisionDriver::new_success(text));

    let directives = generator.generate(&brief(24, 8)).await.unwrap();

    assert_eq!(directives.len(), 3);
    for directive in &directives {
        assert_eq!(directive.content(), &DirectiveContent::Text(text.to_string()));
        assert_eq!(directive.content().to_payload(), text);
    }
}

#[tokio::test]
async fn test_fence_only_reply_yields_placeholder_prompts() {
    let harness = Harness::new();
    let (generator, driver, _) =
        prompt_generator(&harness.config, MockVisionDriver::new_success("```json\n```"));

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    assert_eq!(driver.call_count(), 1);
    assert_eq!(directives.len(), 2);
    for directive in &directives {
        assert_eq!(
            directive.content().to_payload(),
            "Product commercial, 8 seconds"
        );
    }
}

#[tokio::test]
async fn test_single_object_is_padded() {
    let harness = Harness::new();
    let reply = r#"Here is one: {"description": "Bottle on a pedestal", "mood": "serene"}"#;
    let (generator, _, _) = prompt_generator(&harness.config, MockVisionDriver::new_success(reply));

    let directives = generator.generate(&brief(24, 8)).await.unwrap();

    assert_eq!(directives.len(), 3);
    let numbers: Vec<u32> = directives.iter().map(SegmentDirective::segment_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    for directive in &directives {
        assert_eq!(
            directive.content().primary_text(),
            Some("Bottle on a pedestal")
        );
    }
}

#[tokio::test]
async fn test_excess_segments_are_truncated() {
    let harness = Harness::new();
    let reply = json!([
        {"veo_prompt": "one"},
        {"veo_prompt": "two"},
        {"veo_prompt": "three"}
    ])
    .to_string();
    let (generator, _, _) = prompt_generator(&harness.config, MockVisionDriver::new_success(reply));

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    let prompts: Vec<&str> = directives
        .iter()
        .filter_map(|d| d.content().primary_text())
        .collect();
    assert_eq!(prompts, vec!["one", "two"]);
}

#[tokio::test]
async fn test_missing_primary_field_is_synthesized() {
    let harness = Harness::new();
    let reply = json!([
        {"subject": "the bottle", "action": "turns slowly"},
        {"lighting": "soft"}
    ])
    .to_string();
    let (generator, _, _) = prompt_generator(&harness.config, MockVisionDriver::new_success(reply));

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    assert_eq!(
        directives[0].content().primary_text(),
        Some("the bottle turns slowly")
    );
    assert_eq!(
        directives[1].content().primary_text(),
        Some("Product commercial, 8 seconds")
    );
}

#[tokio::test]
async fn test_empty_responses_retry_with_linear_backoff() {
    let harness = Harness::new();
    let driver = MockVisionDriver::new_sequence(vec![
        MockResponse::Text(String::new()),
        MockResponse::Text("   \n".to_string()),
        MockResponse::Error(GeminiErrorKind::EmptyResponse),
        MockResponse::Text(r#"[{"veo_prompt": "Hero shot"}, {"veo_prompt": "Detail"}]"#.into()),
    ]);
    let (generator, driver, sleeper) = prompt_generator(&harness.config, driver);

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    assert_eq!(directives.len(), 2);
    assert_eq!(driver.call_count(), 4);
    assert_eq!(
        sleeper.delays(),
        vec![
            Duration::from_secs(10),
            Duration::from_secs(20),
            Duration::from_secs(30)
        ]
    );
}

#[tokio::test]
async fn test_unavailable_is_retried_until_exhausted() {
    let harness = Harness::new();
    let unavailable = MockResponse::Error(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "UNAVAILABLE".to_string(),
    });
    let (generator, driver, sleeper) = prompt_generator(
        &harness.config,
        MockVisionDriver::new_sequence(vec![unavailable; 5]),
    );

    let err = generator.generate(&brief(16, 8)).await.unwrap_err();

    assert_eq!(driver.call_count(), 5);
    assert_eq!(sleeper.delays().len(), 4);
    match err.kind() {
        ReelsmithErrorKind::Prompt(e) => {
            assert!(matches!(
                e.kind,
                PromptErrorKind::UnavailableAfterRetries { attempts: 5, .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_all_empty_reports_empty_after_retries() {
    let harness = Harness::new();
    let (generator, driver, _) = prompt_generator(
        &harness.config,
        MockVisionDriver::new_sequence(vec![MockResponse::Text(String::new()); 5]),
    );

    let err = generator.generate(&brief(16, 8)).await.unwrap_err();

    assert_eq!(driver.call_count(), 5);
    match err.kind() {
        ReelsmithErrorKind::Prompt(e) => {
            assert_eq!(e.kind, PromptErrorKind::EmptyAfterRetries(5));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_transient_error_aborts_without_retry() {
    let harness = Harness::new();
    let (generator, driver, sleeper) = prompt_generator(
        &harness.config,
        MockVisionDriver::new_sequence(vec![
            MockResponse::Error(GeminiErrorKind::HttpError {
                status_code: 400,
                message: "INVALID_ARGUMENT".to_string(),
            }),
            MockResponse::Text("never reached".to_string()),
        ]),
    );

    let err = generator.generate(&brief(16, 8)).await.unwrap_err();

    assert_eq!(driver.call_count(), 1);
    assert!(sleeper.delays().is_empty());
    assert!(matches!(err.kind(), ReelsmithErrorKind::Gemini(_)));
}

#[tokio::test]
async fn test_invalid_durations_rejected_before_model_call() {
    let harness = Harness::new();
    for (total, segment) in [(12, 8), (16, 0), (0, 8), (20, 10)] {
        let (generator, driver, _) =
            prompt_generator(&harness.config, MockVisionDriver::new_success("unused"));

        let err = generator.generate(&brief(total, segment)).await.unwrap_err();

        assert_eq!(driver.call_count(), 0);
        assert!(matches!(
            err.kind(),
            ReelsmithErrorKind::Prompt(e) if matches!(e.kind, PromptErrorKind::InvalidDurations { .. })
        ));
    }
}

#[tokio::test]
async fn test_instruction_and_image_reach_the_model() {
    let harness = Harness::new();
    let (generator, driver, _) = prompt_generator(
        &harness.config,
        MockVisionDriver::new_success(r#"[{"veo_prompt": "x"}]"#),
    );

    generator.generate(&brief(16, 8)).await.unwrap();

    let request = &driver.requests()[0];
    assert!(request.instruction().contains("Amber glass perfume bottle"));
    assert!(request.instruction().contains("Warm tones, no text overlays"));
    assert!(request.instruction().contains("CRITICAL SAFETY RULE"));
    assert_eq!(request.image().file_name(), "bottle.png");
}

#[tokio::test]
async fn test_directives_are_persisted_when_enabled() {
    let harness = Harness::new();
    let reply = json!([
        {"veo_prompt": "Hero shot", "camera": "crane"},
        {"veo_prompt": "Detail", "camera": "macro"}
    ])
    .to_string();
    let (generator, _, _) = prompt_generator(&harness.config, MockVisionDriver::new_success(reply));

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    let saved = load_directives(&harness.config.prompts.output_file)
        .await
        .unwrap();
    assert_eq!(saved, directives);

    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(&harness.config.prompts.output_file).unwrap())
            .unwrap();
    assert_eq!(raw[1]["segment_number"], 2);
    assert_eq!(raw[1]["duration"], 8);
    assert_eq!(raw[1]["camera"], "macro");
}

#[tokio::test]
async fn test_persistence_failure_does_not_fail_generation() {
    let mut harness = Harness::new();
    harness.config.prompts.output_file = harness.dir.path().join("missing").join("prompts.json");
    let (generator, _, _) = prompt_generator(
        &harness.config,
        MockVisionDriver::new_success(r#"[{"veo_prompt": "Hero"}]"#),
    );

    let directives = generator.generate(&brief(16, 8)).await.unwrap();

    assert_eq!(directives.len(), 2);
    assert!(!harness.config.prompts.output_file.exists());
}
