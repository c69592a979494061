//! Rule table turning a parsed response into exactly N directives.
//!
//! | response   | elements                                         |
//! |------------|--------------------------------------------------|
//! | `Array`    | each item; non-objects wrapped as `veo_prompt`   |
//! | `Object`   | the object alone                                 |
//! | `RawText`  | the text (or placeholder), once per segment      |
//!
//! Every element then gets its position as `segment_number`, a duration,
//! and a primary content field. The list is padded by repeating the last
//! directive or truncated to the required count.

use crate::ModelResponse;
use reelsmith_core::{
    DURATION_KEY, DirectiveContent, PRIMARY_CONTENT_KEY, SEGMENT_NUMBER_KEY, SegmentDirective,
};
use serde_json::{Map, Value};

/// Fields searched, in order, when an element lacks a usable primary field.
pub const FALLBACK_CONTENT_KEYS: [&str; 7] = [
    PRIMARY_CONTENT_KEY,
    "description",
    "prompt",
    "scene_summary",
    "subject",
    "context",
    "action",
];

/// Number of segments needed to cover `total_duration`.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::segment_count;
///
/// assert_eq!(segment_count(16, 8), 2);
/// assert_eq!(segment_count(20, 8), 3);
/// assert_eq!(segment_count(16, 0), 0);
/// ```
pub fn segment_count(total_duration: u32, segment_duration: u32) -> usize {
    if segment_duration == 0 {
        return 0;
    }
    total_duration.div_ceil(segment_duration) as usize
}

/// Build exactly `count` directives from a parsed response.
#[tracing::instrument(skip(response), fields(required = count))]
pub fn build_directives(
    response: ModelResponse,
    count: usize,
    segment_duration: u32,
) -> Vec<SegmentDirective> {
    if count == 0 {
        return Vec::new();
    }

    let mut directives: Vec<SegmentDirective> = match response {
        ModelResponse::RawText(text) => {
            let text = if text.trim().is_empty() {
                tracing::debug!("Response was blank once cleaned, using placeholder");
                synthesize_primary(&Map::new(), segment_duration)
            } else {
                text
            };
            (1..=count)
                .map(|n| {
                    SegmentDirective::new(
                        n as u32,
                        segment_duration,
                        DirectiveContent::Text(text.clone()),
                    )
                })
                .collect()
        }
        ModelResponse::Object(fields) => {
            vec![normalize_element(
                Value::Object(fields),
                1,
                segment_duration,
            )]
        }
        ModelResponse::Array(items) if items.is_empty() => {
            vec![normalize_element(
                Value::Object(Map::new()),
                1,
                segment_duration,
            )]
        }
        ModelResponse::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| normalize_element(item, i as u32 + 1, segment_duration))
            .collect(),
    };

    let parsed = directives.len();
    if parsed < count {
        tracing::warn!(
            parsed,
            required = count,
            "Model returned too few segments, repeating the last one"
        );
        while directives.len() < count {
            let Some(last) = directives.last() else {
                break;
            };
            let copy = last.renumbered(directives.len() as u32 + 1);
            directives.push(copy);
        }
    } else if parsed > count {
        tracing::warn!(
            parsed,
            required = count,
            "Model returned too many segments, truncating"
        );
        directives.truncate(count);
    }

    directives
}

/// Turn one response element into a directive at `segment_number`.
///
/// Bookkeeping keys are lifted out of the content. A model supplied
/// positive integer duration is kept; anything else gets the default.
fn normalize_element(item: Value, segment_number: u32, default_duration: u32) -> SegmentDirective {
    let mut fields = match item {
        Value::Object(fields) => fields,
        Value::String(text) => primary_only(text),
        other => primary_only(other.to_string()),
    };

    fields.remove(SEGMENT_NUMBER_KEY);
    let duration = fields
        .remove(DURATION_KEY)
        .and_then(|d| d.as_u64())
        .filter(|d| *d > 0)
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(default_duration);

    if !has_primary_content(&fields) {
        let synthesized = synthesize_primary(&fields, duration);
        tracing::debug!(segment = segment_number, "Synthesized primary content field");
        fields.insert(PRIMARY_CONTENT_KEY.to_string(), Value::String(synthesized));
    }

    SegmentDirective::new(
        segment_number,
        duration,
        DirectiveContent::from_fields(fields),
    )
}

fn primary_only(text: String) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(PRIMARY_CONTENT_KEY.to_string(), Value::String(text));
    fields
}

fn has_primary_content(fields: &Map<String, Value>) -> bool {
    match fields.get(PRIMARY_CONTENT_KEY) {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

/// Join the non-empty string fallbacks, or produce a generic placeholder.
fn synthesize_primary(fields: &Map<String, Value>, duration: u32) -> String {
    let parts: Vec<&str> = FALLBACK_CONTENT_KEYS
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect();

    if parts.is_empty() {
        format!("Product commercial, {} seconds", duration)
    } else {
        parts.join(" ")
    }
}
