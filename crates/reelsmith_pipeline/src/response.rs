//! Tiered interpretation of the text/vision model's reply.

use crate::extraction::{extract_balanced, strip_code_fences};
use serde_json::{Map, Value};

/// Shape of a model reply after tiered parsing.
///
/// Tiers are tried in order: the first balanced `[...]` span that parses
/// as a non-empty JSON array, then the first balanced `{...}` span that
/// parses as a JSON object, then the whole cleaned text.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    /// A JSON array, one element per directive
    Array(Vec<Value>),
    /// A single JSON object, one directive
    Object(Map<String, Value>),
    /// Unstructured text, replicated across every directive
    RawText(String),
}

impl ModelResponse {
    /// Classify a raw response. Never fails; anything unparseable is text.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_pipeline::ModelResponse;
    ///
    /// let reply = "```json\n[{\"veo_prompt\": \"Slow orbit\"}]\n```";
    /// assert!(matches!(ModelResponse::parse(reply), ModelResponse::Array(items) if items.len() == 1));
    ///
    /// let reply = "Slow orbit around the bottle";
    /// assert_eq!(
    ///     ModelResponse::parse(reply),
    ///     ModelResponse::RawText("Slow orbit around the bottle".to_string())
    /// );
    /// ```
    pub fn parse(raw: &str) -> Self {
        let clean = strip_code_fences(raw);

        if let Some(span) = extract_balanced(&clean, '[', ']')
            && let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&span)
            && !items.is_empty()
        {
            tracing::debug!(items = items.len(), "Parsed JSON array response");
            return ModelResponse::Array(items);
        }

        if let Some(span) = extract_balanced(&clean, '{', '}')
            && let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(&span)
        {
            tracing::debug!(keys = fields.len(), "Parsed single JSON object response");
            return ModelResponse::Object(fields);
        }

        tracing::info!(chars = clean.len(), "Response is not JSON, using it as text");
        ModelResponse::RawText(clean)
    }
}
