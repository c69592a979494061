//! Gemini text/vision client on Vertex AI.

mod client;
mod dto;

pub use client::VertexGeminiClient;
pub use dto::{
    GeminiCandidate, GeminiContent, GeminiInlineData, GeminiPart, GenerateContentRequest,
    GenerateContentResponse,
};
