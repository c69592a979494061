//! Scene directive command handler.

use super::{PromptCommands, ad_request};
use reelsmith::{
    JsonError, PipelineConfig, ReelsmithResult, SegmentDirective, build_pipeline,
    load_directives,
};

/// Handle `prompts` subcommands.
pub async fn handle_prompt_command(
    command: PromptCommands,
    config: PipelineConfig,
) -> ReelsmithResult<()> {
    match command {
        PromptCommands::Generate(args) => {
            let request = ad_request(&args).await?;
            let pipeline = build_pipeline(config)?;
            let directives = pipeline.plan(&request).await?;
            let json = serde_json::to_string_pretty(&directives).map_err(|e| {
                JsonError::new(format!("Failed to serialize directives: {}", e))
            })?;
            println!("{}", json);
        }
        PromptCommands::Show { file } => {
            let path = file.unwrap_or_else(|| config.prompts.output_file.clone());
            let directives = load_directives(&path).await?;
            println!("{} ({} segments)", path.display(), directives.len());
            for directive in &directives {
                println!("{}", summary_line(directive));
            }
        }
    }
    Ok(())
}

fn summary_line(directive: &SegmentDirective) -> String {
    let content = directive.content();
    let text = content
        .primary_text()
        .map(str::to_string)
        .unwrap_or_else(|| content.to_payload());
    format!(
        "  [{}] {}s  {}",
        directive.segment_number(),
        directive.duration(),
        text
    )
}
