//! Utilities for pulling structured data out of model responses.
//!
//! Model responses often wrap JSON in markdown code fences or surround it
//! with explanatory text. These helpers remove the fences and locate the
//! first balanced JSON span.

use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?").expect("Valid code fence regex"));

/// Remove markdown code fences (```` ```json ```` and ```` ``` ````) and trim.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
/// assert_eq!(strip_code_fences("  plain text  "), "plain text");
/// ```
pub fn strip_code_fences(response: &str) -> String {
    CODE_FENCE.replace_all(response, "").trim().to_string()
}

/// Extract content between balanced delimiters.
///
/// Finds the first occurrence of `open` and returns the span up to the
/// matching `close`, handling nesting and ignoring delimiters inside
/// string literals. Returns `None` if the span never closes.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::extract_balanced;
///
/// let response = r#"Here you go: [{"a": "]"}, {"b": [1]}] thanks"#;
/// assert_eq!(
///     extract_balanced(response, '[', ']').as_deref(),
///     Some(r#"[{"a": "]"}, {"b": [1]}]"#)
/// );
/// assert!(extract_balanced("[unterminated", '[', ']').is_none());
/// ```
pub fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
