//! Reelsmith CLI binary.
//!
//! This binary provides command-line access to Reelsmith:
//! - Generate a complete advertising video from product photos
//! - Generate or inspect scene directives without rendering video
//! - Inspect and validate configuration

use clap::Parser;
use reelsmith::{ObservabilityConfig, init_observability_with_config};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, handle_config_command, handle_prompt_command, load_config, run_generate,
    };

    // Credentials such as GOOGLE_OAUTH_ACCESS_TOKEN may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability_with_config(
        ObservabilityConfig::default()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate(args) => {
            let result = run_generate(&args, config).await?;
            if !result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Prompts(prompt_cmd) => {
            handle_prompt_command(prompt_cmd, config).await?;
        }

        Commands::Config(config_cmd) => {
            handle_config_command(config_cmd, &config)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
