//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the reelsmith binary.

mod commands;
mod config;
mod generate;
mod prompts;

pub use commands::{BriefArgs, Cli, Commands, ConfigCommands, PromptCommands};
pub use config::{handle_config_command, load_config};
pub use generate::{ad_request, run_generate};
pub use prompts::handle_prompt_command;
