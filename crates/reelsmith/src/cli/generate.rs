//! Video generation command handler.

use super::BriefArgs;
use reelsmith::{
    AdRequest, JsonError, PipelineConfig, PipelineError, PipelineErrorKind, PipelineResult,
    ProductImage, ReelsmithResult, build_pipeline,
};
use tracing::info;

/// Read the photos named in `args` and assemble a request.
pub async fn ad_request(args: &BriefArgs) -> ReelsmithResult<AdRequest> {
    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(ProductImage::from_path(path).await?);
    }

    AdRequest::builder()
        .images(images)
        .product_overview(args.overview.clone())
        .brand_guidelines(args.brand.clone())
        .total_duration(args.total)
        .segment_duration(args.segment)
        .build()
        .map_err(|e| PipelineError::new(PipelineErrorKind::InvalidInput(e.to_string())).into())
}

/// Run the full pipeline and print its result as JSON.
///
/// Returns the result so the caller can choose the exit status.
pub async fn run_generate(
    args: &BriefArgs,
    config: PipelineConfig,
) -> ReelsmithResult<PipelineResult> {
    let request = ad_request(args).await?;
    let pipeline = build_pipeline(config)?;

    info!(images = request.images().len(), "Starting video generation");
    let result = pipeline.run(&request).await;

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| JsonError::new(format!("Failed to serialize result: {}", e)))?;
    println!("{}", json);
    Ok(result)
}
