//! Configuration command handler.

use super::ConfigCommands;
use reelsmith::{GenerationMode, PipelineConfig, ReelsmithResult};
use std::path::Path;

/// Load the configuration from `path`, or by layered discovery when absent.
pub fn load_config(path: Option<&Path>) -> ReelsmithResult<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::load()?,
    };
    Ok(config)
}

/// Handle `config` subcommands.
pub fn handle_config_command(
    command: ConfigCommands,
    config: &PipelineConfig,
) -> ReelsmithResult<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            if config.video.mode == GenerationMode::Extension {
                config.extension.validate()?;
            }
            let seconds = config.planned_duration();
            println!("Configuration is valid");
            println!("  mode:            {:?}", config.video.mode);
            println!("  planned length:  {}s", seconds);
            println!(
                "  estimated cost:  ${:.2} at {}",
                config.estimated_cost(seconds),
                config.video.resolution
            );
        }
    }
    Ok(())
}
