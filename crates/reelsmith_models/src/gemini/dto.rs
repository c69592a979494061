//! Vertex AI `generateContent` data transfer objects.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Inline binary part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    /// MIME type of `data`
    mime_type: String,
    /// Base64-encoded bytes
    data: String,
}

impl GeminiInlineData {
    /// Create an inline part from already encoded data.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One part of a content turn: text or inline data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Inline binary content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
}

impl GeminiPart {
    /// A text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline data part.
    pub fn from_inline(data: GeminiInlineData) -> Self {
        Self {
            text: None,
            inline_data: Some(data),
        }
    }
}

/// One content turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct GeminiContent {
    /// `user` or `model`
    #[serde(default)]
    role: String,
    /// Parts of the turn
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    /// A user turn.
    pub fn user(parts: Vec<GeminiPart>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }
}

/// Request body of `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerateContentRequest {
    /// Conversation turns
    contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    /// Create a request from turns.
    pub fn new(contents: Vec<GeminiContent>) -> Self {
        Self { contents }
    }
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content
    #[serde(default)]
    content: Option<GeminiContent>,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct GenerateContentResponse {
    /// Candidates, usually one
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any content.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub(crate) error: ApiErrorStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorStatus {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) status: String,
}
