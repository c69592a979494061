//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelsmith - product advertising videos from photos with Gemini and Veo
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(about = "Generate product advertising videos from photos with Gemini and Veo", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to layered discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a complete advertising video
    Generate(BriefArgs),

    /// Scene directive commands
    #[command(subcommand)]
    Prompts(PromptCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Product brief shared by commands that call the models.
#[derive(clap::Args, Debug, Clone)]
pub struct BriefArgs {
    /// Product photo; repeat for more (the first drives prompt generation)
    #[arg(short, long = "image", required = true)]
    pub images: Vec<PathBuf>,

    /// Product description
    #[arg(short, long)]
    pub overview: String,

    /// Brand guidelines
    #[arg(short, long, default_value = "")]
    pub brand: String,

    /// Total video length in seconds
    #[arg(long)]
    pub total: Option<u32>,

    /// Segment length in seconds
    #[arg(long)]
    pub segment: Option<u32>,
}

/// Scene directive subcommands
#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Generate scene directives without rendering video
    Generate(BriefArgs),

    /// Print a saved directive file
    Show {
        /// Directive file (defaults to prompts.output_file)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Validate the configuration and print the cost estimate
    Validate,
}
