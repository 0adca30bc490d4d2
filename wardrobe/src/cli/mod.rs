// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::infrastructure::di::ServiceContainer;

pub mod args;
pub mod commands;
pub mod display;
pub mod error;

pub async fn execute_command(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    let color = !cli.no_color;
    match cli.command {
        Some(Commands::Clothing { action }) => {
            commands::execute(services.clothing_store.as_ref(), action, color).await
        }
        Some(Commands::Outfit { action }) => {
            commands::execute(services.outfit_store.as_ref(), action, color).await
        }
        None => Ok(()),
    }
}
