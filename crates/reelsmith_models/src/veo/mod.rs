//! Veo video client on Vertex AI.

mod client;
mod dto;

pub use client::{VertexVeoClient, extension_output_prefix};
pub use dto::{
    GcsMedia, OperationError, OperationResult, OperationVideo, PredictInstance, PredictOperation,
    PredictParameters, PredictParametersBuilder, PredictRequest,
};
